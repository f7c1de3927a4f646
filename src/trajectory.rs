use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

/// One reconstructed trajectory sample, in millimeters relative to the
/// frame-0 position.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct TrajectoryPoint {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

/// One speed sample in mm/s, stamped with the timestamp of the later frame
/// of its displacement interval.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct VelocitySample {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Velocity")]
    pub speed: f64,
}

/// Persist the trajectory as a Time,X,Y,Z table.
pub fn write_trajectory(path: &Path, points: &[TrajectoryPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create trajectory file {}", path.display()))?;
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    info!("Wrote {} trajectory points to {}", points.len(), path.display());
    Ok(())
}

/// Persist the smoothed velocity series as a Time,Velocity table.
pub fn write_velocity(path: &Path, samples: &[VelocitySample]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create velocity file {}", path.display()))?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    info!("Wrote {} velocity samples to {}", samples.len(), path.display());
    Ok(())
}
