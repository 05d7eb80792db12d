use glam::{Mat4, Vec3};

//
// ──────────────────────────────────────────────────────────────
//   Camera (first-person, Euler angles, Y-up right-hand rule)
//
//   Coordinate system:
//     X → right
//     Y → up
//     Z → towards the viewer (the camera looks down -Z at yaw -90°)
//
//   Angles are stored in degrees:
//     yaw   = rotation about world up, unbounded
//     pitch = rotation about the camera right axis, ±89°
//     zoom  = vertical field of view, 1°..45°
//
//   front/right/up are cached and rebuilt after every yaw/pitch change,
//   so they always form an orthonormal basis.
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement
{
  Forward,
  Backward,
  Left,
  Right,
}

#[derive(Debug, Clone)]
pub struct Camera
{
  pub position: Vec3,
  pub movement_speed: f32,
  pub mouse_sensitivity: f32,

  world_up: Vec3,
  yaw: f32,
  pitch: f32,
  zoom: f32,

  front: Vec3,
  right: Vec3,
  up: Vec3,
}

//
// ──────────────────────────────────────────────────────────────
//   Constants
// ──────────────────────────────────────────────────────────────
//

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_ZOOM: f32 = 45.0;

pub const PITCH_LIMIT: f32 = 89.0;
pub const ZOOM_MIN: f32 = 1.0;
pub const ZOOM_MAX: f32 = 45.0;

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl Camera
{
  pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self
  {
    let mut camera = Self {
      position,
      movement_speed: DEFAULT_SPEED,
      mouse_sensitivity: DEFAULT_SENSITIVITY,

      world_up: world_up.normalize(),
      yaw,
      pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
      zoom: DEFAULT_ZOOM,

      front: Vec3::NEG_Z,
      right: Vec3::X,
      up: Vec3::Y,
    };

    camera.update_vectors();
    camera
  }

  /// Default orientation (looking down -Z) placed at `position`.
  pub fn at(position: Vec3) -> Self
  {
    Self::new(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
  }

  pub fn view_matrix(&self) -> Mat4
  {
    Mat4::look_at_rh(self.position, self.position + self.front, self.up)
  }

  /// Right-handed perspective with a [0, 1] depth range, driven by `zoom`.
  pub fn projection_matrix(&self, aspect: f32, znear: f32, zfar: f32) -> Mat4
  {
    Mat4::perspective_rh(self.zoom.to_radians(), aspect, znear, zfar)
  }

  pub fn process_keyboard(&mut self, direction: Movement, delta_time: f32)
  {
    let velocity = self.movement_speed * delta_time;

    match direction
    {
      Movement::Forward => self.position += self.front * velocity,
      Movement::Backward => self.position -= self.front * velocity,
      Movement::Left => self.position -= self.right * velocity,
      Movement::Right => self.position += self.right * velocity,
    }
  }

  /// `delta_y` is expected with "up is positive"; screen-space callers
  /// negate their cursor delta before calling.
  pub fn process_mouse_movement(&mut self, delta_x: f32, delta_y: f32, constrain_pitch: bool)
  {
    self.yaw += delta_x * self.mouse_sensitivity;
    self.pitch += delta_y * self.mouse_sensitivity;

    if constrain_pitch
    {
      self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    self.update_vectors();
  }

  pub fn process_mouse_scroll(&mut self, delta_y: f32)
  {
    self.zoom = (self.zoom - delta_y).clamp(ZOOM_MIN, ZOOM_MAX);
  }

  pub fn yaw(&self) -> f32
  {
    self.yaw
  }

  pub fn pitch(&self) -> f32
  {
    self.pitch
  }

  pub fn zoom(&self) -> f32
  {
    self.zoom
  }

  pub fn front(&self) -> Vec3
  {
    self.front
  }

  pub fn right(&self) -> Vec3
  {
    self.right
  }

  pub fn up(&self) -> Vec3
  {
    self.up
  }

  pub fn world_up(&self) -> Vec3
  {
    self.world_up
  }

  fn update_vectors(&mut self)
  {
    self.front = front_from_angles(self.yaw, self.pitch);
    self.right = self.front.cross(self.world_up).normalize();
    self.up = self.right.cross(self.front).normalize();
  }
}

impl Default for Camera
{
  fn default() -> Self
  {
    Self::at(Vec3::ZERO)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Euler → direction
// ──────────────────────────────────────────────────────────────
//

fn front_from_angles(yaw: f32, pitch: f32) -> Vec3
{
  let (sin_yaw, cos_yaw) = yaw.to_radians().sin_cos();
  let (sin_pitch, cos_pitch) = pitch.to_radians().sin_cos();

  Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
}

#[cfg(test)]
mod tests
{
  use super::*;

  const EPS: f32 = 1e-5;

  fn assert_orthonormal(camera: &Camera)
  {
    let (f, r, u) = (camera.front(), camera.right(), camera.up());

    assert!((f.length() - 1.0).abs() < EPS, "front not unit: {f}");
    assert!((r.length() - 1.0).abs() < EPS, "right not unit: {r}");
    assert!((u.length() - 1.0).abs() < EPS, "up not unit: {u}");

    assert!(f.dot(r).abs() < EPS);
    assert!(f.dot(u).abs() < EPS);
    assert!(r.dot(u).abs() < EPS);
  }

  #[test]
  fn default_camera_looks_down_negative_z()
  {
    let camera = Camera::default();

    assert_eq!(camera.position, Vec3::ZERO);
    assert_eq!(camera.yaw(), -90.0);
    assert_eq!(camera.pitch(), 0.0);
    assert_eq!(camera.zoom(), 45.0);
    assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPS));
    assert!(camera.right().abs_diff_eq(Vec3::X, EPS));
    assert!(camera.up().abs_diff_eq(Vec3::Y, EPS));
  }

  #[test]
  fn basis_is_orthonormal_for_many_orientations()
  {
    for yaw in (-720..=720).step_by(37)
    {
      for pitch in (-89..=89).step_by(11)
      {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, yaw as f32, pitch as f32);
        assert_orthonormal(&camera);
      }
    }
  }

  #[test]
  fn basis_follows_cross_product_definition()
  {
    let camera = Camera::new(Vec3::ZERO, Vec3::Y, 30.0, 20.0);

    let right = camera.front().cross(Vec3::Y).normalize();
    let up = right.cross(camera.front()).normalize();

    assert!(camera.right().abs_diff_eq(right, EPS));
    assert!(camera.up().abs_diff_eq(up, EPS));
  }

  #[test]
  fn pitch_stays_clamped_under_mouse_movement()
  {
    let mut camera = Camera::default();

    for step in 0..200
    {
      let dy = if step % 3 == 0 { -750.0 } else { 420.0 };
      camera.process_mouse_movement(13.0, dy, true);

      assert!(camera.pitch() >= -PITCH_LIMIT && camera.pitch() <= PITCH_LIMIT);
      assert_orthonormal(&camera);
    }
  }

  #[test]
  fn unconstrained_pitch_is_not_clamped()
  {
    let mut camera = Camera::default();
    camera.process_mouse_movement(0.0, 1000.0, false);

    assert!((camera.pitch() - 100.0).abs() < EPS);
  }

  #[test]
  fn zoom_stays_clamped_under_scrolling()
  {
    let mut camera = Camera::default();

    for delta in [3.0, 10.0, 50.0, -7.0, -100.0, 0.5, 44.0, -2.0]
    {
      camera.process_mouse_scroll(delta);
      assert!(camera.zoom() >= ZOOM_MIN && camera.zoom() <= ZOOM_MAX);
    }

    camera.process_mouse_scroll(1000.0);
    assert_eq!(camera.zoom(), ZOOM_MIN);

    camera.process_mouse_scroll(-1000.0);
    assert_eq!(camera.zoom(), ZOOM_MAX);
  }

  #[test]
  fn view_matrix_maps_eye_to_origin_and_front_to_negative_z()
  {
    let eye = Vec3::new(4.0, -2.0, 7.0);
    // yaw 90° looks along +Z
    let camera = Camera::new(eye, Vec3::Y, 90.0, 0.0);
    assert!(camera.front().abs_diff_eq(Vec3::Z, EPS));

    let view = camera.view_matrix();

    assert!(view.transform_point3(eye).abs_diff_eq(Vec3::ZERO, EPS));
    assert!(view.transform_point3(eye + Vec3::Z).abs_diff_eq(Vec3::NEG_Z, EPS));
  }

  #[test]
  fn keyboard_forward_moves_along_front()
  {
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, -90.0, 0.0);
    assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPS));

    camera.process_keyboard(Movement::Forward, 1.0);

    assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), EPS));
  }

  #[test]
  fn keyboard_strafe_moves_along_right()
  {
    let mut camera = Camera::default();
    camera.movement_speed = 2.0;

    camera.process_keyboard(Movement::Right, 0.5);
    assert!(camera.position.abs_diff_eq(Vec3::X, EPS));

    camera.process_keyboard(Movement::Left, 1.0);
    camera.process_keyboard(Movement::Backward, 0.25);
    assert!(camera.position.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.5), EPS));
  }

  #[test]
  fn large_mouse_movement_clamps_pitch_and_turns_yaw()
  {
    let mut camera = Camera::default();
    camera.process_mouse_movement(100.0, 1000.0, true);

    assert_eq!(camera.pitch(), 89.0);
    assert!((camera.yaw() - (-80.0)).abs() < EPS);
  }

  #[test]
  fn view_matrix_is_idempotent()
  {
    let mut camera = Camera::at(Vec3::new(1.0, 1.5, 3.0));
    camera.process_mouse_movement(37.0, -12.0, true);

    assert_eq!(camera.view_matrix(), camera.view_matrix());
  }

  #[test]
  fn constructor_clamps_pitch()
  {
    let camera = Camera::new(Vec3::ZERO, Vec3::Y, 0.0, 120.0);

    assert_eq!(camera.pitch(), PITCH_LIMIT);
    assert_orthonormal(&camera);
  }

  #[test]
  fn projection_uses_zoom_as_vertical_fov()
  {
    let mut camera = Camera::default();
    camera.process_mouse_scroll(15.0);

    let expected = Mat4::perspective_rh(30f32.to_radians(), 1.5, 0.1, 100.0);
    assert!(camera.projection_matrix(1.5, 0.1, 100.0).abs_diff_eq(expected, EPS));
  }
}
