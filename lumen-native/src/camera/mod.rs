pub mod uniform;

pub use uniform::{CameraBinding, CameraUniform, ZFAR, ZNEAR};
