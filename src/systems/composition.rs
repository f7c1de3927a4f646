use nalgebra::Point3;

use crate::Point2D;
use crate::camera::CameraIntrinsics;
use crate::trajectory::TrajectoryPoint;

/// Back-project one frame to a 3D point (meters, camera-1 frame) given the
/// current depth estimates. Camera 1 supplies X and Y; camera 2's vertical
/// axis supplies Z, sign-flipped because its image y runs opposite to the
/// world depth axis.
pub fn compose_point(
    cam1_px: Point2D,
    cam2_px: Point2D,
    z1: f64,
    z2: f64,
    cam1: &CameraIntrinsics,
    cam2: &CameraIntrinsics,
) -> Point3<f64> {
    let (x1, y1) = cam1_px;
    let (_x2, y2) = cam2_px;
    Point3::new(
        (x1 - cam1.cx) * z1 / cam1.fx,
        (y1 - cam1.cy) * z1 / cam1.fy,
        -(y2 - cam2.cy) * z2 / cam2.fy,
    )
}

/// Re-origin the composed series to its first point and convert to
/// millimeters, pairing each entry with its timestamp. Entry 0 is always
/// (t0, 0, 0, 0).
pub fn finalize_trajectory(
    raw_points: &[Point3<f64>],
    timestamps: &[f64],
) -> Vec<TrajectoryPoint> {
    let Some(origin) = raw_points.first() else {
        return Vec::new();
    };
    raw_points
        .iter()
        .zip(timestamps.iter())
        .map(|(p, &time)| {
            let relative = p - origin;
            TrajectoryPoint {
                time,
                x: relative.x * 1000.0,
                y: relative.y * 1000.0,
                z: relative.z * 1000.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn centered_intrinsics() -> CameraIntrinsics {
        CameraIntrinsics {
            fx: 1000.0,
            fy: 1000.0,
            cx: 0.0,
            cy: 0.0,
        }
    }

    #[test]
    fn composes_pinhole_back_projection() {
        let cam = centered_intrinsics();
        let p = compose_point((10.0, 20.0), (30.0, 40.0), 2.0, 1.0, &cam, &cam);
        assert_relative_eq!(p.x, 0.02);
        assert_relative_eq!(p.y, 0.04);
        assert_relative_eq!(p.z, -0.04);
    }

    #[test]
    fn z_sign_is_inverted_against_camera_two_image_axis() {
        let cam = centered_intrinsics();
        // Object below camera 2's optical center (larger image y) maps to
        // negative world Z
        let below = compose_point((0.0, 0.0), (0.0, 100.0), 1.0, 1.0, &cam, &cam);
        let above = compose_point((0.0, 0.0), (0.0, -100.0), 1.0, 1.0, &cam, &cam);
        assert!(below.z < 0.0);
        assert!(above.z > 0.0);
    }

    #[test]
    fn finalize_re_origins_and_scales_to_mm() {
        let raw = vec![
            Point3::new(0.5, 0.25, -0.1),
            Point3::new(0.51, 0.25, -0.1),
            Point3::new(0.5, 0.24, -0.08),
        ];
        let timestamps = vec![0.0, 0.1, 0.2];
        let trajectory = finalize_trajectory(&raw, &timestamps);

        assert_eq!(trajectory.len(), 3);
        assert_relative_eq!(trajectory[0].time, 0.0);
        assert_relative_eq!(trajectory[0].x, 0.0);
        assert_relative_eq!(trajectory[0].y, 0.0);
        assert_relative_eq!(trajectory[0].z, 0.0);

        assert_relative_eq!(trajectory[1].x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(trajectory[2].y, -10.0, epsilon = 1e-9);
        assert_relative_eq!(trajectory[2].z, 20.0, epsilon = 1e-9);
    }
}
