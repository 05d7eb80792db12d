use glam::Vec3;
use lumen_core::timing::FrameClock;
use lumen_core::{Camera, LumenConfig};

use crate::camera::CameraUniform;
use crate::input::camera_control::apply_input_to_camera;
use crate::input::InputState;

/// Everything a demo may read each frame: camera, input, timing and
/// the loaded configuration.
pub struct AppContext
{
  pub config: LumenConfig,
  pub camera: Camera,
  pub input: InputState,
  pub clock: FrameClock,

  pub width: u32,
  pub height: u32,

  pub mouse_captured: bool,
  pub show_hud: bool,
}

impl AppContext
{
  pub fn new(config: LumenConfig, camera_start: Vec3) -> Self
  {
    let mut camera = Camera::at(camera_start);
    config.apply_to_camera(&mut camera);

    let (width, height) = (config.window.width, config.window.height);

    Self {
      config,
      camera,
      input: InputState::new(),
      clock: FrameClock::new(),
      width,
      height,
      mouse_captured: false,
      show_hud: true,
    }
  }

  pub fn aspect(&self) -> f32
  {
    if self.height == 0
    {
      return 1.0;
    }

    self.width as f32 / self.height as f32
  }

  pub fn resize(&mut self, width: u32, height: u32)
  {
    self.width = width;
    self.height = height;
  }

  /// Tick the clock and move the camera from this frame's input.
  pub fn begin_frame(&mut self) -> f32
  {
    let dt = self.clock.tick();
    self.update_camera(dt);
    dt
  }

  pub fn update_camera(&mut self, delta_time: f32)
  {
    apply_input_to_camera(&self.input, &mut self.camera, delta_time, self.mouse_captured);
  }

  pub fn end_frame(&mut self)
  {
    self.input.end_frame();
  }

  pub fn camera_uniform(&self) -> CameraUniform
  {
    CameraUniform::from_camera(&self.camera, self.aspect())
  }

  /// Seconds since start; drives every animation.
  pub fn time(&self) -> f32
  {
    self.clock.elapsed()
  }
}

#[cfg(test)]
mod tests
{
  use winit::keyboard::KeyCode;

  use super::*;

  #[test]
  fn aspect_follows_resize()
  {
    let mut ctx = AppContext::new(LumenConfig::default(), Vec3::ZERO);
    assert!((ctx.aspect() - 800.0 / 600.0).abs() < 1e-6);

    ctx.resize(1920, 1080);
    assert!((ctx.aspect() - 16.0 / 9.0).abs() < 1e-6);

    ctx.resize(640, 0);
    assert_eq!(ctx.aspect(), 1.0);
  }

  #[test]
  fn configured_speed_reaches_camera()
  {
    let config = LumenConfig::from_json(r#"{ "camera": { "movement_speed": 10.0 } }"#).unwrap();
    let mut ctx = AppContext::new(config, Vec3::new(0.0, 0.0, 3.0));

    ctx.input.press_key(KeyCode::KeyS);
    ctx.update_camera(0.1);

    assert!(ctx.camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-5));
  }

  #[test]
  fn free_cursor_does_not_turn_camera()
  {
    let mut ctx = AppContext::new(LumenConfig::default(), Vec3::ZERO);
    ctx.input.add_mouse_motion(200.0, 0.0);
    ctx.update_camera(0.016);
    assert_eq!(ctx.camera.yaw(), -90.0);

    ctx.mouse_captured = true;
    ctx.update_camera(0.016);
    assert!((ctx.camera.yaw() - -70.0).abs() < 1e-4);
  }
}
