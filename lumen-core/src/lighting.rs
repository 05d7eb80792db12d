use glam::Vec3;

//
// ──────────────────────────────────────────────────────────────
//   Light rig (point + directional + spot), Phong terms
//
//   Each light scales the rig colour by fixed ambient / diffuse /
//   specular coefficients; changing the colour (e.g. "funky" mode)
//   re-derives all terms.
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongTerms
{
  pub ambient: Vec3,
  pub diffuse: Vec3,
  pub specular: Vec3,
}

impl PhongTerms
{
  fn scaled(color: Vec3, ambient: f32, diffuse: f32, specular: f32) -> Self
  {
    Self { ambient: color * ambient, diffuse: color * diffuse, specular: color * specular }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation
{
  pub constant: f32,
  pub linear: f32,
  pub quadratic: f32,
}

impl Default for Attenuation
{
  /// Covers roughly a 200-unit reach.
  fn default() -> Self
  {
    Self { constant: 1.0, linear: 0.022, quadratic: 0.0010 }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight
{
  pub position: Vec3,
  pub terms: PhongTerms,
  pub attenuation: Attenuation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight
{
  pub direction: Vec3,
  pub terms: PhongTerms,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight
{
  pub position: Vec3,
  pub direction: Vec3,
  pub terms: PhongTerms,
  pub attenuation: Attenuation,
  pub inner_cone_deg: f32,
  pub outer_cone_deg: f32,
}

impl SpotLight
{
  pub fn inner_cos(&self) -> f32
  {
    self.inner_cone_deg.to_radians().cos()
  }

  pub fn outer_cos(&self) -> f32
  {
    self.outer_cone_deg.to_radians().cos()
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig
{
  pub color: Vec3,
  pub point: PointLight,
  pub directional: DirectionalLight,
  pub spot: SpotLight,
  pub spot_enabled: bool,
}

//
// ──────────────────────────────────────────────────────────────
//   Constants
// ──────────────────────────────────────────────────────────────
//

const ORBIT_RADIUS: f32 = 4.0;
const ORBIT_HEIGHT: f32 = 0.5;
const SPOT_POSITION: Vec3 = Vec3::new(0.0, 3.0, 0.0);
const SPOT_SWEEP_RADIUS: f32 = 1.5;
const SUN_DIRECTION: Vec3 = Vec3::new(-1.0, -1.0, 0.0);

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl LightRig
{
  pub fn new(point_position: Vec3) -> Self
  {
    let mut rig = Self {
      color: Vec3::ONE,
      point: PointLight {
        position: point_position,
        terms: PhongTerms::scaled(Vec3::ONE, 0.0, 0.0, 0.0),
        attenuation: Attenuation::default(),
      },
      directional: DirectionalLight {
        direction: SUN_DIRECTION.normalize(),
        terms: PhongTerms::scaled(Vec3::ONE, 0.0, 0.0, 0.0),
      },
      spot: SpotLight {
        position: SPOT_POSITION,
        direction: Vec3::NEG_Y,
        terms: PhongTerms::scaled(Vec3::ONE, 0.0, 0.0, 0.0),
        attenuation: Attenuation::default(),
        inner_cone_deg: 15.0,
        outer_cone_deg: 20.0,
      },
      spot_enabled: true,
    };

    rig.set_color(Vec3::ONE);
    rig
  }

  pub fn set_color(&mut self, color: Vec3)
  {
    self.color = color;
    self.point.terms = PhongTerms::scaled(color, 0.1, 0.5, 1.0);
    self.directional.terms = PhongTerms::scaled(color, 0.05, 0.3, 1.0);
    self.spot.terms = PhongTerms::scaled(color, 0.1, 0.5, 1.0);
  }

  /// Orbit the point light and sweep the spotlight for time `t` (seconds).
  pub fn animate(&mut self, t: f32)
  {
    self.point.position = orbit_position(t);
    let aim = spot_target(t) - self.spot.position;
    self.spot.direction = aim.try_normalize().unwrap_or(Vec3::NEG_Y);
  }
}

impl Default for LightRig
{
  fn default() -> Self
  {
    Self::new(Vec3::new(1.2, 0.5, 1.0))
  }
}

pub fn orbit_position(t: f32) -> Vec3
{
  Vec3::new(ORBIT_RADIUS * t.sin(), ORBIT_HEIGHT, ORBIT_RADIUS * t.cos())
}

pub fn spot_target(t: f32) -> Vec3
{
  Vec3::new(SPOT_SWEEP_RADIUS * t.cos(), 0.0, SPOT_SWEEP_RADIUS * t.sin())
}

/// Slowly cycling colour; components may go negative, which darkens.
pub fn funky_color(t: f32) -> Vec3
{
  Vec3::new((t * 2.0).sin(), (t * 0.8).cos(), (t * 1.5).sin())
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn default_rig_uses_white_light()
  {
    let rig = LightRig::default();

    assert_eq!(rig.color, Vec3::ONE);
    assert_eq!(rig.point.terms.diffuse, Vec3::splat(0.5));
    assert_eq!(rig.directional.terms.ambient, Vec3::splat(0.05));
    assert_eq!(rig.spot.terms.specular, Vec3::ONE);
    assert!(rig.directional.direction.is_normalized());
  }

  #[test]
  fn set_color_rescales_every_light()
  {
    let mut rig = LightRig::default();
    let red = Vec3::new(1.0, 0.0, 0.0);
    rig.set_color(red);

    assert_eq!(rig.point.terms.ambient, Vec3::new(0.1, 0.0, 0.0));
    assert_eq!(rig.directional.terms.diffuse, Vec3::new(0.3, 0.0, 0.0));
    assert_eq!(rig.spot.terms.diffuse, Vec3::new(0.5, 0.0, 0.0));
  }

  #[test]
  fn point_light_orbits_at_fixed_radius()
  {
    for step in 0..50
    {
      let p = orbit_position(step as f32 * 0.37);
      assert!((Vec3::new(p.x, 0.0, p.z).length() - ORBIT_RADIUS).abs() < 1e-4);
      assert_eq!(p.y, ORBIT_HEIGHT);
    }
  }

  #[test]
  fn spotlight_aims_at_sweeping_target()
  {
    let mut rig = LightRig::default();
    let t = 1.3;
    rig.animate(t);

    let expected = (spot_target(t) - SPOT_POSITION).normalize();
    assert!(rig.spot.direction.abs_diff_eq(expected, 1e-6));
    assert!(rig.point.position.abs_diff_eq(orbit_position(t), 1e-6));
  }

  #[test]
  fn cone_cosines_are_ordered()
  {
    let spot = LightRig::default().spot;
    assert!(spot.inner_cos() > spot.outer_cos());
  }

  #[test]
  fn funky_color_starts_green()
  {
    assert!(funky_color(0.0).abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
  }
}
