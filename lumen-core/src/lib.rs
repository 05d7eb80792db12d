//! GPU-free building blocks shared by the Lumen demos: the first-person
//! camera, cube-map face maths, instancing scatter, post-processing
//! kernels, the light rig, frame timing and JSON configuration.

pub mod camera;
pub mod config;
pub mod cube_faces;
pub mod error;
pub mod kernel;
pub mod lighting;
pub mod scatter;
pub mod timing;

pub use camera::{Camera, Movement};
pub use config::LumenConfig;
pub use error::ConfigError;
