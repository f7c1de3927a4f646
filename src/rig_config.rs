use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::camera::{CameraIntrinsics, CameraModel, DistortionCoefficients};

// Calibration of the stock rig (Logitech C920 pair); used whenever no rig
// config file is provided
const DEFAULT_FX: f64 = 1397.9;
const DEFAULT_FY: f64 = 1403.0;
const DEFAULT_CX: f64 = 953.6590;
const DEFAULT_CY: f64 = 555.1515;
const DEFAULT_K1: f64 = 0.1216;
const DEFAULT_K2: f64 = -0.1727;

// Physical box dimensions (mm) as seen from each camera
const BOX_WIDTH_CAM1_MM: f64 = 108.0;
const BOX_HEIGHT_CAM1_MM: f64 = 56.0;
const BOX_WIDTH_CAM2_MM: f64 = 108.0;
const BOX_HEIGHT_CAM2_MM: f64 = 32.0;

const SMOOTHING_WINDOW: usize = 50;

/// Per-camera configuration: the camera model plus the real-world size of
/// the calibration box as seen from that camera.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct CameraConfig {
    pub camera: CameraModel,
    pub box_real_width_mm: f64,
    pub box_real_height_mm: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct RigConfig {
    pub cam1: CameraConfig,
    pub cam2: CameraConfig,

    /// Moving-average window (in samples) applied to the raw speed series
    pub velocity_smoothing_window: usize,
}

impl Default for RigConfig {
    fn default() -> Self {
        let camera = CameraModel {
            intrinsics: CameraIntrinsics {
                fx: DEFAULT_FX,
                fy: DEFAULT_FY,
                cx: DEFAULT_CX,
                cy: DEFAULT_CY,
            },
            distortion: DistortionCoefficients {
                k1: DEFAULT_K1,
                k2: DEFAULT_K2,
                p1: 0.0,
                p2: 0.0,
                k3: 0.0,
            },
        };
        RigConfig {
            cam1: CameraConfig {
                camera,
                box_real_width_mm: BOX_WIDTH_CAM1_MM,
                box_real_height_mm: BOX_HEIGHT_CAM1_MM,
            },
            cam2: CameraConfig {
                camera,
                box_real_width_mm: BOX_WIDTH_CAM2_MM,
                box_real_height_mm: BOX_HEIGHT_CAM2_MM,
            },
            velocity_smoothing_window: SMOOTHING_WINDOW,
        }
    }
}

/// Load the rig config from a JSON file. A missing file falls back to the
/// built-in rig defaults; a file that exists but fails to parse is an error.
pub fn load_rig_config(config_file_path: &str) -> Result<RigConfig> {
    match std::fs::read_to_string(config_file_path) {
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                warn!(
                    "Rig config file not found at {}; using built-in defaults",
                    config_file_path
                );
                Ok(RigConfig::default())
            } else {
                Err(anyhow!(
                    "failed to read rig config {}: {}",
                    config_file_path,
                    e
                ))
            }
        }
        Ok(s) => match serde_json::from_str::<RigConfig>(&s) {
            Ok(config) => {
                info!("Loaded rig config OK from \"{}\"", config_file_path);
                debug!("Rig config parsed from file: {:?}", &config);
                Ok(config)
            }
            Err(e) => Err(anyhow!("failed to parse rig config data: {}", e)),
        },
    }
}

/// Write the rig config as pretty-printed JSON, e.g. to seed a new setup.
pub fn write_rig_config(config: &RigConfig, config_file_path: &str) -> Result<()> {
    let text = serde_json::to_string_pretty(config)?;
    std::fs::write(config_file_path, text)?;
    info!("Wrote rig config to file: {:?}", config_file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_stock_rig() {
        let config = RigConfig::default();
        assert_relative_eq!(config.cam1.camera.intrinsics.fx, 1397.9);
        assert_relative_eq!(config.cam2.box_real_height_mm, 32.0);
        assert_eq!(config.velocity_smoothing_window, 50);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_rig_config("/nonexistent/rig.json").unwrap();
        assert_relative_eq!(config.cam1.box_real_width_mm, 108.0);
    }

    #[test]
    fn config_round_trips_through_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rig.json");
        let path = path.to_str().unwrap();

        let mut config = RigConfig::default();
        config.velocity_smoothing_window = 10;
        config.cam2.camera.intrinsics.fy = 1500.0;
        write_rig_config(&config, path).unwrap();

        let loaded = load_rig_config(path).unwrap();
        assert_eq!(loaded.velocity_smoothing_window, 10);
        assert_relative_eq!(loaded.cam2.camera.intrinsics.fy, 1500.0);
    }

    #[test]
    fn garbage_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rig.json");
        std::fs::write(&path, "{not valid json").unwrap();
        assert!(load_rig_config(path.to_str().unwrap()).is_err());
    }
}
