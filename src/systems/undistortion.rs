use crate::Point2D;
use crate::camera::CameraModel;

/// Undistort every point of a raw pixel track. Pure per-frame map; the
/// output track stays in pixel units and keeps the input's timestamps.
pub fn undistort_points(points: &[Point2D], camera: &CameraModel) -> Vec<Point2D> {
    points.iter().map(|p| camera.undistort_pixel(*p)).collect()
}
