use log::info;
use nalgebra::Point3;

use crate::Point2D;
use crate::calibration::CalibrationBox;
use crate::rig_config::CameraConfig;
use crate::systems::composition::compose_point;

/// Per-frame camera-to-object distances in meters, one pair per frame.
/// Entries after index 0 depend on the 3D point composed at the previous
/// index, so the series is only meaningful in strict frame order.
#[derive(Debug, Clone)]
pub struct DepthSeries {
    pub z1: Vec<f64>,
    pub z2: Vec<f64>,
}

/// Depth series plus the raw composed 3D points (meters, not yet
/// re-origined) that the recursion produced along the way.
#[derive(Debug, Clone)]
pub struct DepthEstimate {
    pub depths: DepthSeries,
    pub raw_points: Vec<Point3<f64>>,
}

/// Similar-triangles pinhole distance from a camera to the calibration box:
/// focal_length_px * real_width_m / width_px.
pub fn camera_to_box_distance(real_width_mm: f64, width_px: f64, focal_length_px: f64) -> f64 {
    focal_length_px * (real_width_mm / 1000.0) / width_px
}

/// Run the recursive depth estimation over undistorted tracks.
///
/// Each camera observes only two world axes, so the depth baseline of each
/// is anchored at frame 0 using the *other* camera's offset from the bottom
/// edge of its calibration box. From there, frame i+1's depths are inferred
/// from the 3D point composed at frame i. This first-order coupling assumes
/// small, smooth inter-frame displacement and drifts under abrupt motion.
pub fn estimate_depths(
    cam1_points: &[Point2D],
    cam2_points: &[Point2D],
    cam1: &CameraConfig,
    cam2: &CameraConfig,
    box1: &CalibrationBox,
    box2: &CalibrationBox,
) -> DepthEstimate {
    let frames = cam1_points.len();
    let (Some(first_cam1), Some(first_cam2)) = (cam1_points.first(), cam2_points.first()) else {
        return DepthEstimate {
            depths: DepthSeries {
                z1: Vec::new(),
                z2: Vec::new(),
            },
            raw_points: Vec::new(),
        };
    };

    let cam1_to_box =
        camera_to_box_distance(cam1.box_real_width_mm, box1.width_px, cam1.camera.intrinsics.fx);
    let cam2_to_box =
        camera_to_box_distance(cam2.box_real_width_mm, box2.width_px, cam2.camera.intrinsics.fx);
    info!("Initial camera 1 to box distance: {:.4}m", cam1_to_box);
    info!("Initial camera 2 to box distance: {:.4}m", cam2_to_box);

    // Frame-0 position above each box's bottom edge, in meters
    let initial_y = (box1.bottom_edge_y() - first_cam1.1) * (box1.mm_per_pixel_y / 1000.0);
    let initial_z = (box2.bottom_edge_y() - first_cam2.1) * (box2.mm_per_pixel_y / 1000.0);

    let mut z1 = vec![0.0; frames];
    let mut z2 = vec![0.0; frames];
    z1[0] = cam1_to_box + initial_z;
    z2[0] = cam2_to_box + initial_y;
    info!("Initial camera 1 to object distance: {:.4}m", z1[0]);
    info!("Initial camera 2 to object distance: {:.4}m", z2[0]);

    // Strictly sequential: frame i+1's depths come from frame i's point
    let mut raw_points: Vec<Point3<f64>> = Vec::with_capacity(frames);
    for i in 0..frames {
        let point = compose_point(
            cam1_points[i],
            cam2_points[i],
            z1[i],
            z2[i],
            &cam1.camera.intrinsics,
            &cam2.camera.intrinsics,
        );
        raw_points.push(point);
        if i + 1 < frames {
            let first = raw_points[0];
            z1[i + 1] = z1[0] + (point.z - first.z);
            z2[i + 1] = z2[0] - (point.y - first.y);
        }
    }

    DepthEstimate {
        depths: DepthSeries { z1, z2 },
        raw_points,
    }
}
