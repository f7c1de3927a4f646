use anyhow::{Result, bail};
use nalgebra::Vector3;
use ndarray::Array1;

use crate::trajectory::{TrajectoryPoint, VelocitySample};

/// Frame-to-frame 3D speed in mm/s, one sample per consecutive pair,
/// stamped with the later frame's timestamp.
///
/// Track validation already rejects duplicate timestamps; the dt guard here
/// keeps a degenerate interval from ever turning into an infinite speed.
pub fn frame_speeds(trajectory: &[TrajectoryPoint]) -> Result<Vec<VelocitySample>> {
    let mut samples = Vec::with_capacity(trajectory.len().saturating_sub(1));
    for (i, pair) in trajectory.windows(2).enumerate() {
        let (a, b) = (pair[0], pair[1]);
        let dt = b.time - a.time;
        if !dt.is_finite() || dt <= 0.0 {
            bail!(
                "zero-duration interval between frames {} and {} (dt = {})",
                i,
                i + 1,
                dt
            );
        }
        let displacement = Vector3::new(b.x - a.x, b.y - a.y, b.z - a.z);
        samples.push(VelocitySample {
            time: b.time,
            speed: displacement.norm() / dt,
        });
    }
    Ok(samples)
}

/// Uniform trailing moving average, "valid" mode: no edge padding, output
/// length len - window + 1, sample k stamped with the raw timestamp at
/// index window - 1 + k. Shorter input than the window yields an empty
/// series; window 1 is a no-op.
pub fn smooth_speeds(raw: &[VelocitySample], window: usize) -> Result<Vec<VelocitySample>> {
    if window == 0 {
        bail!("velocity smoothing window must be at least 1");
    }
    if raw.len() < window {
        return Ok(Vec::new());
    }

    let speeds: Array1<f64> = raw.iter().map(|s| s.speed).collect();
    Ok(speeds
        .windows(window)
        .into_iter()
        .enumerate()
        .map(|(k, w)| VelocitySample {
            time: raw[window - 1 + k].time,
            speed: w.sum() / window as f64,
        })
        .collect())
}
