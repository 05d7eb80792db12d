use glam::{Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//
// ──────────────────────────────────────────────────────────────
//   Asteroid ring scatter
//
//   Each asteroid starts on a circle of `radius` in the XZ plane,
//   alternating between the +Z and -Z half, then gets a random
//   offset in [0, 1)³, a random tumble axis/angle and a small scale.
// ──────────────────────────────────────────────────────────────
//

const JITTER: f32 = 1.0;
const MAX_ANGLE_DEG: f32 = 90.0;
const MAX_SCALE: f32 = 1.0 / 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid
{
  pub position: Vec3,
  pub axis: Vec3,
  pub angle_deg: f32,
  pub scale: f32,
}

impl Asteroid
{
  /// Translate · rotate · scale, applied to the unit rock mesh.
  pub fn model_matrix(&self) -> Mat4
  {
    Mat4::from_scale_rotation_translation(
      Vec3::splat(self.scale),
      Quat::from_axis_angle(self.axis, self.angle_deg.to_radians()),
      self.position,
    )
  }
}

pub fn scatter_ring<R: Rng>(rng: &mut R, count: usize, radius: f32) -> Vec<Asteroid>
{
  (0..count).map(|i| scatter_one(rng, i, radius)).collect()
}

pub fn scatter_ring_seeded(count: usize, radius: f32, seed: u64) -> Vec<Asteroid>
{
  let mut rng = StdRng::seed_from_u64(seed);
  scatter_ring(&mut rng, count, radius)
}

//
// ──────────────────────────────────────────────────────────────
//   Helpers
// ──────────────────────────────────────────────────────────────
//

fn scatter_one<R: Rng>(rng: &mut R, index: usize, radius: f32) -> Asteroid
{
  let x = if radius > 0.0 { rng.random_range(-radius..radius) } else { 0.0 };
  let side = if index % 2 == 0 { 1.0 } else { -1.0 };
  let z = side * (radius * radius - x * x).max(0.0).sqrt();

  let jitter = random_unit_cube(rng) * JITTER;
  let axis = random_unit_cube(rng).try_normalize().unwrap_or(Vec3::Y);

  Asteroid {
    position: Vec3::new(x, 0.0, z) + jitter,
    axis,
    angle_deg: rng.random::<f32>() * MAX_ANGLE_DEG,
    scale: rng.random::<f32>() * MAX_SCALE,
  }
}

fn random_unit_cube<R: Rng>(rng: &mut R) -> Vec3
{
  Vec3::new(rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>())
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn produces_requested_count()
  {
    assert_eq!(scatter_ring_seeded(0, 10.0, 1).len(), 0);
    assert_eq!(scatter_ring_seeded(250, 10.0, 1).len(), 250);
  }

  #[test]
  fn asteroids_hug_the_ring()
  {
    let radius = 10.0;

    for (i, rock) in scatter_ring_seeded(500, radius, 42).iter().enumerate()
    {
      let p = rock.position;
      let planar = Vec3::new(p.x, 0.0, p.z).length();

      // jitter is at most one unit along each axis
      assert!((planar - radius).abs() <= 2f32.sqrt() + 1e-4, "rock {i} at {p}");
      assert!(p.y >= 0.0 && p.y < 1.0);

      if i % 2 == 0
      {
        assert!(p.z >= 0.0);
      }
      else
      {
        assert!(p.z < 1.0);
      }
    }
  }

  #[test]
  fn orientation_and_scale_ranges()
  {
    for rock in scatter_ring_seeded(300, 10.0, 7)
    {
      assert!((rock.axis.length() - 1.0).abs() < 1e-5);
      assert!(rock.angle_deg >= 0.0 && rock.angle_deg < 90.0);
      assert!(rock.scale >= 0.0 && rock.scale < 1.0 / 6.0);
    }
  }

  #[test]
  fn same_seed_same_field()
  {
    assert_eq!(scatter_ring_seeded(64, 10.0, 99), scatter_ring_seeded(64, 10.0, 99));
    assert_ne!(scatter_ring_seeded(64, 10.0, 99), scatter_ring_seeded(64, 10.0, 100));
  }

  #[test]
  fn zero_radius_collapses_to_jitter()
  {
    for rock in scatter_ring_seeded(20, 0.0, 3)
    {
      assert!(rock.position.cmpge(Vec3::ZERO).all());
      assert!(rock.position.cmplt(Vec3::ONE).all());
    }
  }

  #[test]
  fn model_matrix_places_and_scales()
  {
    let rock = Asteroid {
      position: Vec3::new(3.0, 0.5, -2.0),
      axis: Vec3::Y,
      angle_deg: 90.0,
      scale: 0.5,
    };

    let m = rock.model_matrix();

    assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(rock.position, 1e-5));
    // +X rotated 90° about +Y lands on -Z, then halves
    let tip = m.transform_point3(Vec3::X) - rock.position;
    assert!(tip.abs_diff_eq(Vec3::new(0.0, 0.0, -0.5), 1e-5));
  }
}
