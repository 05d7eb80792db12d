//! Native front end for the Lumen demos: window, GPU setup, input
//! routing, the egui HUD and the demo scenes themselves. Each binary
//! under `src/bin` is a one-liner that hands a [`demos::Demo`] to
//! [`launch`].

pub mod app;
pub mod camera;
pub mod context;
pub mod demos;
pub mod input;
pub mod renderer;

pub use app::launch;
