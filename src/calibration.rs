use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use serde::Deserialize;

/// One row of a tracker-produced box file.
#[derive(Deserialize, Debug)]
struct BoxRecord {
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
    #[serde(rename = "Width")]
    width: f64,
    #[serde(rename = "Height")]
    height: f64,
}

/// Calibration box as seen by one camera: pixel bounds of the known-size
/// object, plus the mm-per-pixel scales derived from its real dimensions.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationBox {
    pub x: f64,
    pub y: f64,
    pub width_px: f64,
    pub height_px: f64,
    pub mm_per_pixel_x: f64,
    pub mm_per_pixel_y: f64,
    /// Set when the box record was missing and identity scales are in use;
    /// downstream output is then not metrically meaningful.
    pub degraded: bool,
}

impl CalibrationBox {
    /// Pass-through calibration used when no box record is available.
    pub fn identity() -> Self {
        CalibrationBox {
            x: 1.0,
            y: 1.0,
            width_px: 1.0,
            height_px: 1.0,
            mm_per_pixel_x: 1.0,
            mm_per_pixel_y: 1.0,
            degraded: true,
        }
    }

    /// Pixel row of the bottom edge of the box; the reference line for the
    /// initial depth offsets.
    pub fn bottom_edge_y(&self) -> f64 {
        self.y + self.height_px
    }
}

/// Load a single-row box CSV (columns X, Y, Width, Height) and derive the
/// mm-per-pixel scales from the real-world box dimensions.
///
/// A missing file is the one recoverable failure in the pipeline: it
/// degrades to identity scales with a warning. A present but degenerate
/// record (zero or negative pixel size) is fatal.
pub fn load_calibration_box(
    path: &Path,
    real_width_mm: f64,
    real_height_mm: f64,
) -> Result<CalibrationBox> {
    if !path.exists() {
        warn!(
            "Box file not found: {}; using identity scales (uncalibrated)",
            path.display()
        );
        return Ok(CalibrationBox::identity());
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open box file {}", path.display()))?;
    let record: BoxRecord = match reader.deserialize().next() {
        Some(r) => r.with_context(|| format!("failed to parse box file {}", path.display()))?,
        None => bail!("box file {} contains no data rows", path.display()),
    };

    if !(record.width > 0.0) || !(record.height > 0.0) {
        bail!(
            "box file {} has degenerate pixel dimensions {}x{}",
            path.display(),
            record.width,
            record.height
        );
    }

    let calibration = CalibrationBox {
        x: record.x,
        y: record.y,
        width_px: record.width,
        height_px: record.height,
        mm_per_pixel_x: real_width_mm / record.width,
        mm_per_pixel_y: real_height_mm / record.height,
        degraded: false,
    };
    info!(
        "Loaded calibration box from {}: {}x{} px, {:.4}/{:.4} mm per pixel",
        path.display(),
        calibration.width_px,
        calibration.height_px,
        calibration.mm_per_pixel_x,
        calibration.mm_per_pixel_y
    );
    Ok(calibration)
}
