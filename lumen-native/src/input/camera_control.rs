use lumen_core::{Camera, Movement};
use winit::keyboard::KeyCode;

use crate::input::InputState;

//
// ──────────────────────────────────────────────────────────────
//   Key bindings
// ──────────────────────────────────────────────────────────────
//

const MOVEMENT_KEYS: [(KeyCode, Movement); 4] = [
  (KeyCode::KeyW, Movement::Forward),
  (KeyCode::KeyS, Movement::Backward),
  (KeyCode::KeyA, Movement::Left),
  (KeyCode::KeyD, Movement::Right),
];

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

/// Mouse look only applies while the cursor is captured, so the HUD
/// stays usable with a free pointer.
pub fn apply_input_to_camera(input: &InputState, camera: &mut Camera, delta_time: f32, mouse_look: bool)
{
  apply_movement(input, camera, delta_time);

  if mouse_look
  {
    apply_look(input, camera);
  }

  apply_zoom(input, camera);
}

//
// ──────────────────────────────────────────────────────────────
//   Input handlers
// ──────────────────────────────────────────────────────────────
//

fn apply_movement(input: &InputState, camera: &mut Camera, delta_time: f32)
{
  for (key, direction) in MOVEMENT_KEYS
  {
    if input.is_held(key)
    {
      camera.process_keyboard(direction, delta_time);
    }
  }
}

fn apply_look(input: &InputState, camera: &mut Camera)
{
  if input.mouse_dx == 0.0 && input.mouse_dy == 0.0
  {
    return;
  }

  // Screen y grows downwards; moving the mouse up should pitch up
  camera.process_mouse_movement(input.mouse_dx, -input.mouse_dy, true);
}

fn apply_zoom(input: &InputState, camera: &mut Camera)
{
  if input.scroll == 0.0
  {
    return;
  }

  camera.process_mouse_scroll(input.scroll);
}

#[cfg(test)]
mod tests
{
  use glam::Vec3;

  use super::*;

  #[test]
  fn held_w_moves_forward()
  {
    let mut input = InputState::new();
    let mut camera = Camera::at(Vec3::ZERO);
    input.press_key(KeyCode::KeyW);

    apply_input_to_camera(&input, &mut camera, 1.0, false);

    let expected = camera.front() * camera.movement_speed;
    assert!(camera.position.abs_diff_eq(expected, 1e-5));
  }

  #[test]
  fn opposite_keys_cancel()
  {
    let mut input = InputState::new();
    let mut camera = Camera::at(Vec3::ONE);
    input.press_key(KeyCode::KeyA);
    input.press_key(KeyCode::KeyD);

    apply_input_to_camera(&input, &mut camera, 0.5, false);

    assert!(camera.position.abs_diff_eq(Vec3::ONE, 1e-5));
  }

  #[test]
  fn mouse_up_pitches_up_when_captured()
  {
    let mut input = InputState::new();
    let mut camera = Camera::default();
    input.add_mouse_motion(0.0, -50.0);

    apply_input_to_camera(&input, &mut camera, 0.0, true);

    assert!((camera.pitch() - 50.0 * camera.mouse_sensitivity).abs() < 1e-4);
  }

  #[test]
  fn mouse_is_ignored_when_not_captured()
  {
    let mut input = InputState::new();
    let mut camera = Camera::default();
    input.add_mouse_motion(120.0, 40.0);

    apply_input_to_camera(&input, &mut camera, 0.0, false);

    assert_eq!(camera.yaw(), lumen_core::camera::DEFAULT_YAW);
    assert_eq!(camera.pitch(), 0.0);
  }

  #[test]
  fn scroll_changes_zoom()
  {
    let mut input = InputState::new();
    let mut camera = Camera::default();
    input.add_scroll(5.0);

    apply_input_to_camera(&input, &mut camera, 0.0, false);

    assert_eq!(camera.zoom(), 40.0);
  }
}
