use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;
use serde::Deserialize;

use crate::Point2D;

/// One row of a tracker-produced locations file.
#[derive(Deserialize, Debug)]
struct TrackRecord {
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
    #[serde(rename = "Time (seconds)")]
    time: f64,
}

/// Per-camera 2D pixel track, aligned 1:1 with its timestamp series.
#[derive(Debug, Clone)]
pub struct Track2D {
    pub points: Vec<Point2D>,
    pub timestamps: Vec<f64>,
}

impl Track2D {
    pub fn new(points: Vec<Point2D>, timestamps: Vec<f64>) -> Self {
        Track2D { points, timestamps }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The validated input of the reconstruction: both cameras' undistortable
/// pixel tracks plus the shared timestamp series (camera 1's).
#[derive(Debug, Clone)]
pub struct AlignedTracks {
    pub cam1: Vec<Point2D>,
    pub cam2: Vec<Point2D>,
    pub timestamps: Vec<f64>,
}

impl AlignedTracks {
    /// Check the cross-camera alignment invariants. Any mismatch is fatal;
    /// the pipeline never truncates silently.
    pub fn validate(cam1: &Track2D, cam2: &Track2D) -> Result<AlignedTracks> {
        if cam1.is_empty() || cam2.is_empty() {
            bail!(
                "tracks must contain at least one frame (camera 1: {}, camera 2: {})",
                cam1.len(),
                cam2.len()
            );
        }
        if cam1.len() != cam2.len() {
            bail!(
                "track length mismatch: camera 1 has {} frames, camera 2 has {}",
                cam1.len(),
                cam2.len()
            );
        }
        if cam1.points.len() != cam1.timestamps.len() {
            bail!(
                "track length mismatch: camera 1 has {} points but {} timestamps",
                cam1.points.len(),
                cam1.timestamps.len()
            );
        }

        for i in 1..cam1.timestamps.len() {
            if cam1.timestamps[i] <= cam1.timestamps[i - 1] {
                bail!(
                    "timestamps not strictly increasing at frame {}: {} then {}",
                    i,
                    cam1.timestamps[i - 1],
                    cam1.timestamps[i]
                );
            }
        }

        Ok(AlignedTracks {
            cam1: cam1.points.clone(),
            cam2: cam2.points.clone(),
            timestamps: cam1.timestamps.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Load a per-camera track CSV with columns X, Y and "Time (seconds)".
pub fn load_track(path: &Path) -> Result<Track2D> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open track file {}", path.display()))?;

    let mut points = Vec::new();
    let mut timestamps = Vec::new();
    for (row, record) in reader.deserialize().enumerate() {
        let record: TrackRecord = record.with_context(|| {
            format!("failed to parse row {} of track file {}", row + 1, path.display())
        })?;
        points.push((record.x, record.y));
        timestamps.push(record.time);
    }

    info!("Loaded {} frames from {}", points.len(), path.display());
    Ok(Track2D::new(points, timestamps))
}
