use serde::{Deserialize, Serialize};

use crate::Point2D;

// Fixed-point inversion of the distortion model; matches the tracker's
// undistortion (cv2.undistortPoints with P = camera matrix)
const UNDISTORT_MAX_ITERS: usize = 15;
const UNDISTORT_EPS: f64 = 1e-12;

/// Pinhole intrinsics in pixel units.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    pub fn pixel_to_normalized(&self, point: Point2D) -> Point2D {
        let (x, y) = point;
        ((x - self.cx) / self.fx, (y - self.cy) / self.fy)
    }

    pub fn normalized_to_pixel(&self, point: Point2D) -> Point2D {
        let (x, y) = point;
        (self.fx * x + self.cx, self.fy * y + self.cy)
    }
}

/// Radial/tangential lens distortion, OpenCV coefficient order
/// [k1, k2, p1, p2, k3].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub struct DistortionCoefficients {
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub k3: f64,
}

impl DistortionCoefficients {
    /// Apply the forward distortion model to normalized coordinates.
    pub fn distort_normalized(&self, point: Point2D) -> Point2D {
        let (x, y) = point;
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;
        (x * radial + x_tan, y * radial + y_tan)
    }
}

/// One camera of the rig: intrinsics plus lens distortion.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct CameraModel {
    pub intrinsics: CameraIntrinsics,
    pub distortion: DistortionCoefficients,
}

impl CameraModel {
    /// Map an ideal (undistorted) pixel position to where the lens actually
    /// images it.
    pub fn distort_pixel(&self, point: Point2D) -> Point2D {
        let normalized = self.intrinsics.pixel_to_normalized(point);
        let distorted = self.distortion.distort_normalized(normalized);
        self.intrinsics.normalized_to_pixel(distorted)
    }

    /// Remove lens distortion from a raw pixel position. Output stays in
    /// pixel units (re-projected through the same intrinsics).
    ///
    /// With all coefficients zero this is an exact identity.
    pub fn undistort_pixel(&self, point: Point2D) -> Point2D {
        let (xd, yd) = self.intrinsics.pixel_to_normalized(point);
        let mut x = xd;
        let mut y = yd;

        for _ in 0..UNDISTORT_MAX_ITERS {
            let r2 = x * x + y * y;
            let r4 = r2 * r2;
            let r6 = r4 * r2;
            let radial = 1.0 + self.distortion.k1 * r2
                + self.distortion.k2 * r4
                + self.distortion.k3 * r6;
            let x_tan =
                2.0 * self.distortion.p1 * x * y + self.distortion.p2 * (r2 + 2.0 * x * x);
            let y_tan =
                self.distortion.p1 * (r2 + 2.0 * y * y) + 2.0 * self.distortion.p2 * x * y;

            let x_next = (xd - x_tan) / radial;
            let y_next = (yd - y_tan) / radial;

            let dx = x_next - x;
            let dy = y_next - y;
            x = x_next;
            y = y_next;

            if (dx * dx + dy * dy).sqrt() <= UNDISTORT_EPS {
                break;
            }
        }

        self.intrinsics.normalized_to_pixel((x, y))
    }
}
