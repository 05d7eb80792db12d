use glam::{Mat4, Quat, Vec3, Vec4};
use image::{Rgba, RgbaImage};
use lumen_core::LumenConfig;

use crate::renderer::flat::{FlatColor, FlatRenderer};
use crate::renderer::lit::{LitRenderer, Material, MaterialParams};
use crate::renderer::mesh::{cube, plane};
use crate::renderer::texture::{checkerboard, disc};
use crate::renderer::{InstanceBuffer, Mesh, Texture};

//
// ──────────────────────────────────────────────────────────────
//   Shared scene: textured crates on a tiled ground plane,
//   optionally dressed with grass cut-outs and a glass pane.
//
//   Used by the lighting, post-processing, reflection and
//   outline demos.
// ──────────────────────────────────────────────────────────────
//

pub const CRATE_POSITIONS: [Vec3; 5] = [
  Vec3::new(0.0, 0.5, 0.0),
  Vec3::new(2.0, 0.5, 2.0),
  Vec3::new(2.0, 0.5, -2.0),
  Vec3::new(-2.0, 0.5, -2.0),
  Vec3::new(-2.0, 0.5, 2.0),
];

const GROUND_SIZE: f32 = 10.0;

const GRASS_POSITIONS: [Vec3; 4] = [
  Vec3::new(2.0, 0.5, 0.0),
  Vec3::new(0.0, 0.5, 2.0),
  Vec3::new(-2.0, 0.5, 0.0),
  Vec3::new(0.0, 0.5, -2.0),
];

const LIGHT_MARKER_SCALE: f32 = 0.05;

/// Diffuse, specular and emission maps of the crate material.
pub struct CrateTextures
{
  pub diffuse: Texture,
  pub specular: Texture,
  pub emission: Texture,
}

impl CrateTextures
{
  pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, config: &LumenConfig) -> Self
  {
    let wood = [150, 100, 50, 255];
    let steel = [90, 90, 95, 255];

    Self {
      diffuse: Texture::load_or(device, queue, &config.asset_path("textures/container2.png"), true, || {
        framed_square(wood, steel)
      }),
      specular: Texture::load_or(device, queue, &config.asset_path("textures/container2_specular.png"), false, || {
        framed_square([0, 0, 0, 255], [200, 200, 200, 255])
      }),
      emission: Texture::load_or(device, queue, &config.asset_path("textures/container2_emission.jpg"), true, || {
        checkerboard(64, 16, [0, 0, 0, 255], [0, 200, 60, 255])
      }),
    }
  }
}

pub struct CrateScene
{
  pub crate_material: Material,
  ground_material: Material,

  cube: Mesh,
  ground_mesh: Mesh,

  crates: InstanceBuffer,
  ground: InstanceBuffer,

  // Kept alive for the bind groups above
  _textures: CrateTextures,
  _ground_texture: Texture,
  _black: Texture,
}

impl CrateScene
{
  pub fn new(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    lit: &LitRenderer,
    config: &LumenConfig,
    crate_positions: &[Vec3],
  ) -> Self
  {
    let textures = CrateTextures::load(device, queue, config);
    let ground_texture = Texture::load_or(device, queue, &config.asset_path("textures/ground.jpg"), true, || {
      checkerboard(64, 2, [120, 120, 120, 255], [90, 90, 90, 255])
    });
    let black = Texture::solid(device, queue, "Black", [0, 0, 0, 255]);

    let crate_material = lit.material(
      device,
      "Crate Material",
      &textures.diffuse,
      &textures.specular,
      &textures.emission,
      MaterialParams::default(),
    );

    let ground_material =
      lit.material(device, "Ground Material", &ground_texture, &black, &black, MaterialParams::default());

    let crate_models: Vec<Mat4> = crate_positions.iter().map(|p| Mat4::from_translation(*p)).collect();

    Self {
      crate_material,
      ground_material,
      cube: Mesh::upload(device, "Crate", &cube()),
      ground_mesh: Mesh::upload(device, "Ground", &plane(GROUND_SIZE)),
      crates: InstanceBuffer::from_matrices(device, "Crate Instances", &crate_models),
      ground: InstanceBuffer::single(device, "Ground Instance", Mat4::from_scale(Vec3::splat(GROUND_SIZE))),
      _textures: textures,
      _ground_texture: ground_texture,
      _black: black,
    }
  }

  /// Expects the lit pipeline, camera and lights already bound.
  pub fn draw_ground(&self, pass: &mut wgpu::RenderPass<'_>)
  {
    pass.set_bind_group(2, &self.ground_material.bind_group, &[]);
    self.ground_mesh.draw(pass, &self.ground);
  }

  pub fn draw_crates(&self, pass: &mut wgpu::RenderPass<'_>)
  {
    pass.set_bind_group(2, &self.crate_material.bind_group, &[]);
    self.cube.draw(pass, &self.crates);
  }

  pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>)
  {
    self.draw_ground(pass);
    self.draw_crates(pass);
  }

  pub fn cube_mesh(&self) -> &Mesh
  {
    &self.cube
  }

  pub fn crate_instances(&self) -> &InstanceBuffer
  {
    &self.crates
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Dressing: alpha-tested grass and a blended window pane
// ──────────────────────────────────────────────────────────────
//

pub struct Dressing
{
  quad: Mesh,

  grass: InstanceBuffer,
  grass_material: Material,

  window: InstanceBuffer,
  window_material: Material,

  _grass_texture: Texture,
  _window_texture: Texture,
  _black: Texture,
}

impl Dressing
{
  pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, lit: &LitRenderer, config: &LumenConfig) -> Self
  {
    let grass_texture = Texture::load_or(device, queue, &config.asset_path("textures/grass.png"), true, || {
      disc(64, [60, 140, 40, 255])
    });
    let window_texture =
      Texture::load_or(device, queue, &config.asset_path("textures/blending_transparent_window.png"), true, window_pane);
    let black = Texture::solid(device, queue, "Black", [0, 0, 0, 255]);

    let grass_material = lit.material(device, "Grass Material", &grass_texture, &black, &black, MaterialParams::default());

    // Window fragments are blended, never discarded
    let window_params = MaterialParams { alpha_cutoff: 0.0, ..MaterialParams::default() };
    let window_material = lit.material(device, "Window Material", &window_texture, &black, &black, window_params);

    Self {
      quad: Mesh::upload(device, "Quad", &plane(1.0)),
      grass: InstanceBuffer::from_matrices(device, "Grass Instances", &grass_models()),
      grass_material,
      window: InstanceBuffer::single(device, "Window Instance", window_model()),
      window_material,
      _grass_texture: grass_texture,
      _window_texture: window_texture,
      _black: black,
    }
  }

  pub fn draw_cutouts(&self, pass: &mut wgpu::RenderPass<'_>)
  {
    pass.set_bind_group(2, &self.grass_material.bind_group, &[]);
    self.quad.draw(pass, &self.grass);
  }

  /// Must come after all opaque geometry.
  pub fn draw_transparent(&self, pass: &mut wgpu::RenderPass<'_>)
  {
    pass.set_bind_group(2, &self.window_material.bind_group, &[]);
    self.quad.draw(pass, &self.window);
  }
}

/// Four crossed quads per tuft, standing upright.
fn grass_models() -> Vec<Mat4>
{
  let stand_up = Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2);

  GRASS_POSITIONS
    .iter()
    .flat_map(|&position| {
      (0..4).map(move |j| {
        Mat4::from_translation(position) * Mat4::from_rotation_y((45.0 * j as f32).to_radians()) * stand_up
      })
    })
    .collect()
}

fn window_model() -> Mat4
{
  Mat4::from_translation(Vec3::new(3.0, 0.8, 0.0)) * Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2)
}

//
// ──────────────────────────────────────────────────────────────
//   Light markers: small flat cubes at each light position
// ──────────────────────────────────────────────────────────────
//

pub struct LightMarkers
{
  cube: Mesh,
  instances: InstanceBuffer,
  color: FlatColor,
}

impl LightMarkers
{
  pub fn new(device: &wgpu::Device, flat: &FlatRenderer, positions: &[Vec3]) -> Self
  {
    Self {
      cube: Mesh::upload(device, "Light Marker", &cube()),
      instances: InstanceBuffer::from_matrices(device, "Light Marker Instances", &marker_models(positions)),
      color: flat.color(device, "Light Marker Color", Vec4::ONE),
    }
  }

  pub fn update(&mut self, queue: &wgpu::Queue, positions: &[Vec3], color: Vec3)
  {
    self.instances.write(queue, &marker_models(positions));
    self.color.set(queue, color.max(Vec3::ZERO).extend(1.0));
  }

  pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, flat: &FlatRenderer, camera: &wgpu::BindGroup)
  {
    pass.set_pipeline(&flat.pipeline);
    pass.set_bind_group(0, camera, &[]);
    pass.set_bind_group(1, &self.color.bind_group, &[]);
    self.cube.draw(pass, &self.instances);
  }
}

fn marker_models(positions: &[Vec3]) -> Vec<Mat4>
{
  positions
    .iter()
    .map(|p| Mat4::from_scale_rotation_translation(Vec3::splat(LIGHT_MARKER_SCALE), Quat::IDENTITY, *p))
    .collect()
}

//
// ──────────────────────────────────────────────────────────────
//   Generated stand-ins
// ──────────────────────────────────────────────────────────────
//

/// Plank-coloured square inside a metal border.
fn framed_square(inner: [u8; 4], border: [u8; 4]) -> RgbaImage
{
  const SIZE: u32 = 64;
  const EDGE: u32 = 6;

  RgbaImage::from_fn(SIZE, SIZE, |x, y| {
    let on_border = x < EDGE || y < EDGE || x >= SIZE - EDGE || y >= SIZE - EDGE;
    if on_border { Rgba(border) } else { Rgba(inner) }
  })
}

/// Opaque frame around a faintly tinted, mostly transparent pane.
fn window_pane() -> RgbaImage
{
  framed_square([200, 40, 40, 80], [40, 40, 40, 255])
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn grass_quads_stand_upright()
  {
    let models = grass_models();
    assert_eq!(models.len(), 16);

    for model in models
    {
      // The quad's +Y normal ends up horizontal
      let normal = model.transform_vector3(Vec3::Y);
      assert!(normal.y.abs() < 1e-5);
      assert!((model.w_axis.y - 0.5).abs() < 1e-6);
    }
  }

  #[test]
  fn window_pane_is_vertical()
  {
    let normal = window_model().transform_vector3(Vec3::Y);
    assert!(normal.abs_diff_eq(Vec3::NEG_X, 1e-5));
  }

  #[test]
  fn marker_models_are_small_cubes_at_lights()
  {
    let models = marker_models(&[Vec3::new(1.0, 2.0, 3.0)]);
    let (scale, _, translation) = models[0].to_scale_rotation_translation();

    assert!(scale.abs_diff_eq(Vec3::splat(LIGHT_MARKER_SCALE), 1e-6));
    assert!(translation.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
  }

  #[test]
  fn window_stand_in_has_opaque_frame_and_clear_centre()
  {
    let pane = window_pane();

    assert_eq!(pane.get_pixel(0, 0).0[3], 255);
    assert!(pane.get_pixel(32, 32).0[3] < 128);
  }
}
