use clap::{command, Parser};

// Some defaults; some of which can be overriden via CLI args
const RIG_CONFIG_PATH: &str = "./rig.json";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Tracking CSV from camera 1 (columns X, Y, "Time (seconds)")
    #[arg(long = "cam1TrackPath")]
    pub cam1_track_path: String,

    /// Tracking CSV from camera 2
    #[arg(long = "cam2TrackPath")]
    pub cam2_track_path: String,

    /// Where to load the camera rig calibration config
    #[arg(long="rigConfigPath", default_value_t=String::from(RIG_CONFIG_PATH))]
    pub rig_config_path: String,

    /// Calibration box CSV for camera 1; defaults to the track path with
    /// "_locations.csv" replaced by "_box.csv"
    #[arg(long = "cam1BoxPath")]
    pub cam1_box_path: Option<String>,

    /// Calibration box CSV for camera 2; same default rule as camera 1
    #[arg(long = "cam2BoxPath")]
    pub cam2_box_path: Option<String>,

    /// Output trajectory CSV; defaults to the camera-1 track path with
    /// "_cam1_locations.csv" replaced by "_Trajectory.csv"
    #[arg(long = "trajectoryPath")]
    pub trajectory_path: Option<String>,

    /// Optional output CSV for the smoothed velocity series
    #[arg(long = "velocityPath")]
    pub velocity_path: Option<String>,

    #[arg(long = "loglevel", default_value_t=String::from("info"))]
    pub log_level: String,
}
