mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use dualcam_trajectory::calibration::load_calibration_box;
use dualcam_trajectory::rig_config::load_rig_config;
use dualcam_trajectory::systems::reconstruct;
use dualcam_trajectory::track::load_track;
use dualcam_trajectory::trajectory::{write_trajectory, write_velocity};

use cli::Cli;

/// Tracker file convention: "<base>_locations.csv" sits next to
/// "<base>_box.csv".
fn derive_box_path(track_path: &str) -> String {
    track_path.replace("_locations.csv", "_box.csv")
}

/// Output convention: "<base>_cam1_locations.csv" becomes
/// "<base>_Trajectory.csv".
fn derive_trajectory_path(cam1_track_path: &str) -> String {
    cam1_track_path.replace("_cam1_locations.csv", "_Trajectory.csv")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger from the environment
    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    debug!("Started; args: {:?}", cli);

    let rig_config = load_rig_config(&cli.rig_config_path)?;

    let cam1_track = load_track(Path::new(&cli.cam1_track_path))?;
    let cam2_track = load_track(Path::new(&cli.cam2_track_path))?;

    let cam1_box_path = cli
        .cam1_box_path
        .unwrap_or_else(|| derive_box_path(&cli.cam1_track_path));
    let cam2_box_path = cli
        .cam2_box_path
        .unwrap_or_else(|| derive_box_path(&cli.cam2_track_path));
    let cam1_box = load_calibration_box(
        Path::new(&cam1_box_path),
        rig_config.cam1.box_real_width_mm,
        rig_config.cam1.box_real_height_mm,
    )?;
    let cam2_box = load_calibration_box(
        Path::new(&cam2_box_path),
        rig_config.cam2.box_real_width_mm,
        rig_config.cam2.box_real_height_mm,
    )?;

    let result = reconstruct(&rig_config, &cam1_track, &cam2_track, &cam1_box, &cam2_box)?;

    let trajectory_path = cli
        .trajectory_path
        .unwrap_or_else(|| derive_trajectory_path(&cli.cam1_track_path));
    write_trajectory(Path::new(&trajectory_path), &result.trajectory)?;

    if let Some(velocity_path) = &cli.velocity_path {
        write_velocity(Path::new(velocity_path), &result.smoothed_velocity)?;
    }

    info!(
        "Reconstruction finished: {} frames -> {}",
        result.trajectory.len(),
        trajectory_path
    );
    Ok(())
}
