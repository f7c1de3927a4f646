pub mod composition;
pub mod depth;
pub mod undistortion;
pub mod velocity;

use anyhow::Result;
use log::{info, warn};

use crate::calibration::CalibrationBox;
use crate::rig_config::RigConfig;
use crate::track::{AlignedTracks, Track2D};
use crate::trajectory::{TrajectoryPoint, VelocitySample};

use self::depth::DepthSeries;

/// Everything one reconstruction run produces.
#[derive(Debug)]
pub struct Reconstruction {
    pub trajectory: Vec<TrajectoryPoint>,
    pub depths: DepthSeries,
    pub raw_velocity: Vec<VelocitySample>,
    pub smoothed_velocity: Vec<VelocitySample>,
}

/// Run the full batch pipeline over a pair of raw tracks: validate
/// alignment, undistort, estimate depths recursively, compose the metric
/// trajectory, then derive the smoothed velocity series.
///
/// Fails outright on misaligned input; nothing partial is produced.
pub fn reconstruct(
    config: &RigConfig,
    cam1_track: &Track2D,
    cam2_track: &Track2D,
    box1: &CalibrationBox,
    box2: &CalibrationBox,
) -> Result<Reconstruction> {
    let aligned = AlignedTracks::validate(cam1_track, cam2_track)?;
    info!("Reconstructing trajectory over {} frames", aligned.len());

    if box1.degraded || box2.degraded {
        warn!("Calibration is degraded; reconstructed units are not metrically meaningful");
    }

    let cam1_undistorted = undistortion::undistort_points(&aligned.cam1, &config.cam1.camera);
    let cam2_undistorted = undistortion::undistort_points(&aligned.cam2, &config.cam2.camera);

    let estimate = depth::estimate_depths(
        &cam1_undistorted,
        &cam2_undistorted,
        &config.cam1,
        &config.cam2,
        box1,
        box2,
    );

    let trajectory = composition::finalize_trajectory(&estimate.raw_points, &aligned.timestamps);

    let raw_velocity = velocity::frame_speeds(&trajectory)?;
    let smoothed_velocity =
        velocity::smooth_speeds(&raw_velocity, config.velocity_smoothing_window)?;
    info!(
        "Derived {} raw / {} smoothed velocity samples",
        raw_velocity.len(),
        smoothed_velocity.len()
    );

    Ok(Reconstruction {
        trajectory,
        depths: estimate.depths,
        raw_velocity,
        smoothed_velocity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track2D;
    use approx::assert_relative_eq;

    fn test_config(window: usize) -> RigConfig {
        let mut config = RigConfig::default();
        config.velocity_smoothing_window = window;
        config
    }

    fn synthetic_tracks(frames: usize) -> (Track2D, Track2D) {
        let timestamps: Vec<f64> = (0..frames).map(|i| i as f64 / 30.0).collect();
        let cam1: Vec<(f64, f64)> = (0..frames)
            .map(|i| (900.0 + i as f64, 600.0 + i as f64 * 0.5))
            .collect();
        let cam2: Vec<(f64, f64)> = (0..frames)
            .map(|i| (900.0 - i as f64 * 0.25, 620.0 + i as f64 * 0.75))
            .collect();
        (
            Track2D::new(cam1, timestamps.clone()),
            Track2D::new(cam2, timestamps),
        )
    }

    #[test]
    fn output_lengths_match_frame_count() {
        let window = 5;
        let frames = 60;
        let (cam1, cam2) = synthetic_tracks(frames);
        let calibration = CalibrationBox::identity();
        let result =
            reconstruct(&test_config(window), &cam1, &cam2, &calibration, &calibration).unwrap();

        assert_eq!(result.trajectory.len(), frames);
        assert_eq!(result.depths.z1.len(), frames);
        assert_eq!(result.depths.z2.len(), frames);
        assert_eq!(result.raw_velocity.len(), frames - 1);
        assert_eq!(result.smoothed_velocity.len(), frames - 1 - (window - 1));
    }

    #[test]
    fn smoothed_series_is_empty_for_short_tracks() {
        let (cam1, cam2) = synthetic_tracks(10);
        let calibration = CalibrationBox::identity();
        let result =
            reconstruct(&test_config(50), &cam1, &cam2, &calibration, &calibration).unwrap();
        assert_eq!(result.raw_velocity.len(), 9);
        assert!(result.smoothed_velocity.is_empty());
    }

    #[test]
    fn trajectory_starts_at_origin() {
        let (cam1, cam2) = synthetic_tracks(20);
        let calibration = CalibrationBox::identity();
        let result =
            reconstruct(&test_config(5), &cam1, &cam2, &calibration, &calibration).unwrap();
        let first = result.trajectory[0];
        assert_relative_eq!(first.time, 0.0);
        assert_relative_eq!(first.x, 0.0);
        assert_relative_eq!(first.y, 0.0);
        assert_relative_eq!(first.z, 0.0);
    }

    #[test]
    fn stationary_object_reconstructs_to_zeros() {
        let timestamps: Vec<f64> = (0..30).map(|i| i as f64 / 30.0).collect();
        let cam1 = Track2D::new(vec![(900.0, 600.0); 30], timestamps.clone());
        let cam2 = Track2D::new(vec![(950.0, 620.0); 30], timestamps);
        let calibration = CalibrationBox::identity();
        let result =
            reconstruct(&test_config(5), &cam1, &cam2, &calibration, &calibration).unwrap();

        for point in &result.trajectory {
            assert_relative_eq!(point.x, 0.0, epsilon = 1e-9);
            assert_relative_eq!(point.y, 0.0, epsilon = 1e-9);
            assert_relative_eq!(point.z, 0.0, epsilon = 1e-9);
        }
        for sample in &result.raw_velocity {
            assert_relative_eq!(sample.speed, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn mismatched_tracks_fail_before_any_output() {
        let (cam1, _) = synthetic_tracks(100);
        let (cam2, _) = synthetic_tracks(99);
        let calibration = CalibrationBox::identity();
        let err = reconstruct(&test_config(5), &cam1, &cam2, &calibration, &calibration)
            .unwrap_err();
        assert!(err.to_string().contains("length mismatch"));
    }
}
