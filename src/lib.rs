pub mod calibration;
pub mod camera;
pub mod rig_config;
pub mod systems;
pub mod track;
pub mod trajectory;

pub type Point2D = (f64, f64);
