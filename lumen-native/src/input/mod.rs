pub mod camera_control;

use std::collections::HashSet;

use winit::event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

// Trackpads report pixels; treat this many as one wheel notch
const PIXELS_PER_LINE: f32 = 40.0;

pub struct InputState
{
  held: HashSet<KeyCode>,
  pressed: HashSet<KeyCode>,

  /// Raw relative motion since the last frame (device units, +y = down).
  pub mouse_dx: f32,
  pub mouse_dy: f32,

  pub left_clicked: bool,

  pub scroll: f32,
}

impl InputState
{
  pub fn new() -> Self
  {
    Self {
      held: HashSet::new(),
      pressed: HashSet::new(),

      mouse_dx: 0.0,
      mouse_dy: 0.0,

      left_clicked: false,

      scroll: 0.0,
    }
  }

  pub fn handle_event(&mut self, event: &WindowEvent)
  {
    match event
    {
      WindowEvent::KeyboardInput { event, .. } =>
      {
        let PhysicalKey::Code(code) = event.physical_key
        else
        {
          return;
        };

        match event.state
        {
          ElementState::Pressed if !event.repeat => self.press_key(code),
          ElementState::Pressed =>
          {}
          ElementState::Released => self.release_key(code),
        }
      }

      WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } =>
      {
        self.left_clicked = true;
      }

      WindowEvent::MouseWheel { delta, .. } => match delta
      {
        MouseScrollDelta::LineDelta(_, y) => self.add_scroll(*y),
        MouseScrollDelta::PixelDelta(p) => self.add_scroll(p.y as f32 / PIXELS_PER_LINE),
      },

      WindowEvent::Focused(false) => self.release_all(),

      _ =>
      {}
    }
  }

  /// Relative pointer motion; unaffected by cursor grab or window edges.
  pub fn handle_device_event(&mut self, event: &DeviceEvent)
  {
    if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event
    {
      self.add_mouse_motion(*dx as f32, *dy as f32);
    }
  }

  pub fn press_key(&mut self, code: KeyCode)
  {
    if self.held.insert(code)
    {
      self.pressed.insert(code);
    }
  }

  pub fn release_key(&mut self, code: KeyCode)
  {
    self.held.remove(&code);
  }

  pub fn release_all(&mut self)
  {
    self.held.clear();
  }

  pub fn add_mouse_motion(&mut self, dx: f32, dy: f32)
  {
    self.mouse_dx += dx;
    self.mouse_dy += dy;
  }

  pub fn add_scroll(&mut self, lines: f32)
  {
    self.scroll += lines;
  }

  pub fn is_held(&self, code: KeyCode) -> bool
  {
    self.held.contains(&code)
  }

  /// True only on the frame the key went down.
  pub fn was_pressed(&self, code: KeyCode) -> bool
  {
    self.pressed.contains(&code)
  }

  pub fn end_frame(&mut self)
  {
    self.pressed.clear();
    self.mouse_dx = 0.0;
    self.mouse_dy = 0.0;
    self.left_clicked = false;
    self.scroll = 0.0;
  }
}

impl Default for InputState
{
  fn default() -> Self
  {
    Self::new()
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn press_is_edge_triggered()
  {
    let mut input = InputState::new();

    input.press_key(KeyCode::KeyF);
    assert!(input.was_pressed(KeyCode::KeyF));
    assert!(input.is_held(KeyCode::KeyF));

    input.end_frame();
    input.press_key(KeyCode::KeyF); // still held, e.g. a missed release
    assert!(!input.was_pressed(KeyCode::KeyF));
    assert!(input.is_held(KeyCode::KeyF));

    input.release_key(KeyCode::KeyF);
    input.press_key(KeyCode::KeyF);
    assert!(input.was_pressed(KeyCode::KeyF));
  }

  #[test]
  fn motion_and_scroll_accumulate_until_end_frame()
  {
    let mut input = InputState::new();

    input.add_mouse_motion(3.0, -1.0);
    input.add_mouse_motion(2.0, 4.0);
    input.add_scroll(1.0);
    input.add_scroll(0.5);

    assert_eq!((input.mouse_dx, input.mouse_dy), (5.0, 3.0));
    assert_eq!(input.scroll, 1.5);

    input.end_frame();
    assert_eq!((input.mouse_dx, input.mouse_dy, input.scroll), (0.0, 0.0, 0.0));
  }

  #[test]
  fn device_motion_is_recorded()
  {
    let mut input = InputState::new();
    input.handle_device_event(&DeviceEvent::MouseMotion { delta: (4.0, -2.0) });

    assert_eq!((input.mouse_dx, input.mouse_dy), (4.0, -2.0));
  }

  #[test]
  fn losing_focus_releases_keys()
  {
    let mut input = InputState::new();
    input.press_key(KeyCode::KeyW);
    input.handle_event(&WindowEvent::Focused(false));

    assert!(!input.is_held(KeyCode::KeyW));
  }
}
