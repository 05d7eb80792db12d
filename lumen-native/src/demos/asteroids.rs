use glam::{Mat4, Vec3};
use image::{Rgba, RgbaImage};
use lumen_core::lighting::LightRig;
use lumen_core::scatter::scatter_ring_seeded;
use winit::keyboard::KeyCode;

use super::scene::LightMarkers;
use super::{begin_scene_pass, Demo};
use crate::camera::CameraBinding;
use crate::context::AppContext;
use crate::renderer::flat::FlatRenderer;
use crate::renderer::lights::ShadingSettings;
use crate::renderer::lit::{LitRenderer, Material, MaterialParams};
use crate::renderer::mesh::sphere;
use crate::renderer::texture::checkerboard;
use crate::renderer::{Gpu, InstanceBuffer, Mesh, Texture};

//
// ──────────────────────────────────────────────────────────────
//   Asteroids: a planet inside a ring of rocks. The whole ring is
//   one instanced draw; R scatters a fresh ring.
// ──────────────────────────────────────────────────────────────
//

const PLANET_RADIUS: f32 = 2.0;
const LIGHT_POSITION: Vec3 = Vec3::new(8.2, 0.5, 1.0);

pub struct Asteroids
{
  camera: CameraBinding,
  lit: LitRenderer,
  flat: FlatRenderer,
  markers: LightMarkers,

  planet_mesh: Mesh,
  planet: InstanceBuffer,
  planet_material: Material,

  rock_mesh: Mesh,
  rocks: InstanceBuffer,
  rock_material: Material,

  count: usize,
  radius: f32,
  seed: u64,

  _textures: [Texture; 3],
}

impl Demo for Asteroids
{
  const TITLE: &'static str = "Asteroids";
  const CONTROLS: &'static [(&'static str, &'static str)] = &[("R", "scatter a new ring")];

  fn camera_start() -> Vec3
  {
    Vec3::new(0.0, 0.0, 10.0)
  }

  fn new(gpu: &Gpu, ctx: &AppContext) -> anyhow::Result<Self>
  {
    let device = &gpu.device;
    let queue = &gpu.queue;
    let config = &ctx.config;

    let camera_layout = CameraBinding::layout(device);
    let camera = CameraBinding::new(device, &camera_layout, "Asteroids Camera");

    let lit = LitRenderer::new(device, &camera_layout, gpu.format());
    let flat = FlatRenderer::new(device, &camera_layout, gpu.format());

    let mut rig = LightRig::new(LIGHT_POSITION);
    rig.spot_enabled = false;
    lit.write_lights(queue, &rig, ShadingSettings { gamma_correction: true, surface_srgb: gpu.format().is_srgb() });

    let markers = LightMarkers::new(device, &flat, &[LIGHT_POSITION]);

    let planet_texture =
      Texture::load_or(device, queue, &config.asset_path("textures/planet.png"), true, planet_bands);
    let rock_texture = Texture::load_or(device, queue, &config.asset_path("textures/rock.png"), true, || {
      checkerboard(64, 8, [110, 100, 90, 255], [80, 75, 70, 255])
    });
    let black = Texture::solid(device, queue, "Black", [0, 0, 0, 255]);

    let planet_material =
      lit.material(device, "Planet Material", &planet_texture, &black, &black, MaterialParams::default());
    let rock_material = lit.material(device, "Rock Material", &rock_texture, &black, &black, MaterialParams::default());

    let count = config.asteroids.count;
    let radius = config.asteroids.radius;
    let seed = config.asteroids.seed.unwrap_or_else(rand::random);
    log::info!("Scattering {count} asteroids at radius {radius} (seed {seed})");

    let rocks = InstanceBuffer::from_matrices(device, "Asteroid Instances", &ring_models(count, radius, seed));

    Ok(Self {
      camera,
      lit,
      flat,
      markers,
      planet_mesh: Mesh::upload(device, "Planet", &sphere(48, 24)),
      planet: InstanceBuffer::single(device, "Planet Instance", Mat4::from_scale(Vec3::splat(PLANET_RADIUS))),
      planet_material,
      rock_mesh: Mesh::upload(device, "Asteroid", &sphere(7, 5)),
      rocks,
      rock_material,
      count,
      radius,
      seed,
      _textures: [planet_texture, rock_texture, black],
    })
  }

  fn update(&mut self, gpu: &Gpu, ctx: &AppContext)
  {
    if ctx.input.was_pressed(KeyCode::KeyR)
    {
      self.seed = rand::random();
      log::info!("New asteroid ring (seed {})", self.seed);
      self.rocks.write(&gpu.queue, &ring_models(self.count, self.radius, self.seed));
    }

    self.camera.write(&gpu.queue, &ctx.camera_uniform());
  }

  fn render(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView)
  {
    let mut pass = begin_scene_pass(encoder, "Asteroids Pass", target, &gpu.depth.view);

    self.lit.begin(&mut pass, &self.lit.pipeline, &self.camera.bind_group);

    pass.set_bind_group(2, &self.planet_material.bind_group, &[]);
    self.planet_mesh.draw(&mut pass, &self.planet);

    // Every asteroid in a single draw call
    pass.set_bind_group(2, &self.rock_material.bind_group, &[]);
    self.rock_mesh.draw(&mut pass, &self.rocks);

    self.markers.draw(&mut pass, &self.flat, &self.camera.bind_group);
  }

  fn hud(&self, ui: &mut egui::Ui)
  {
    ui.label(format!("{} asteroids, ring radius {}", self.count, self.radius));
    ui.label(format!("seed {}", self.seed));
  }
}

fn ring_models(count: usize, radius: f32, seed: u64) -> Vec<Mat4>
{
  scatter_ring_seeded(count, radius, seed).iter().map(|a| a.model_matrix()).collect()
}

/// Horizontal bands, gas-giant style.
fn planet_bands() -> RgbaImage
{
  RgbaImage::from_fn(128, 64, |_, y| {
    let shade = ((y as f32 * 0.4).sin() * 0.5 + 0.5) * 60.0;
    Rgba([180 + shade as u8, 110 + (shade * 0.5) as u8, 60, 255])
  })
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn ring_is_repeatable_per_seed()
  {
    let a = ring_models(50, 10.0, 42);
    let b = ring_models(50, 10.0, 42);
    let c = ring_models(50, 10.0, 43);

    assert_eq!(a.len(), 50);
    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn rocks_stay_near_the_ring()
  {
    for model in ring_models(200, 10.0, 7)
    {
      let p = model.w_axis.truncate();
      let flat = Vec3::new(p.x, 0.0, p.z).length();

      // Circle of radius 10 plus at most one unit of jitter per axis
      assert!(flat > 10.0 - 2.0 && flat < 10.0 + 2.0, "rock at {p}");
      assert!((0.0..1.0).contains(&p.y));
    }
  }
}
