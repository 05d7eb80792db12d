use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3, Vec4};
use image::{Rgba, RgbaImage};
use lumen_core::lighting::funky_color;
use winit::keyboard::KeyCode;

use super::scene::LightMarkers;
use super::{begin_scene_pass, on_off, Demo};
use crate::camera::CameraBinding;
use crate::context::AppContext;
use crate::input::InputState;
use crate::renderer::depth::opaque_depth;
use crate::renderer::flat::FlatRenderer;
use crate::renderer::mesh::{plane, surface_tangent};
use crate::renderer::pipeline::{
  create_mesh_pipeline, create_shader, sampler_entry, texture_entry, uniform_buffer, uniform_entry,
  MeshPipelineDesc,
};
use crate::renderer::{Gpu, InstanceBuffer, Mesh, Texture};

//
// ──────────────────────────────────────────────────────────────
//   Normal mapping: a brick wall lit by one point light, with
//   per-texel normals read from a tangent-space map.
// ──────────────────────────────────────────────────────────────
//

const LIGHT_POSITION: Vec3 = Vec3::new(2.0, 0.5, 2.0);

const AMBIENT: f32 = 0.05;
const DIFFUSE: f32 = 0.5;
const SPECULAR: f32 = 1.0;
const SHININESS: f32 = 32.0;

const WALL_SCALE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Toggles
{
  normal_map: bool,
  funky: bool,
}

impl Default for Toggles
{
  fn default() -> Self
  {
    Self { normal_map: true, funky: false }
  }
}

impl Toggles
{
  fn apply(&mut self, input: &InputState)
  {
    for (key, flag) in [(KeyCode::KeyN, &mut self.normal_map), (KeyCode::KeyF, &mut self.funky)]
    {
      if input.was_pressed(key)
      {
        *flag = !*flag;
      }
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Surface uniform (normal_map.wgsl), five vec4<f32>: 80 bytes
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct SurfaceUniform
{
  light_pos: [f32; 4],
  light_color: [f32; 4],
  terms: [f32; 4],
  tangent: [f32; 4],
  settings: [f32; 4],
}

impl SurfaceUniform
{
  fn new(light_color: Vec3, tangent: Vec4, normal_map: bool, surface_srgb: bool) -> Self
  {
    let flag = |on: bool| if on { 1.0 } else { 0.0 };

    Self {
      light_pos: LIGHT_POSITION.extend(1.0).to_array(),
      light_color: light_color.extend(1.0).to_array(),
      terms: [AMBIENT, DIFFUSE, SPECULAR, SHININESS],
      tangent: tangent.to_array(),
      settings: [flag(normal_map), flag(surface_srgb), 0.0, 0.0],
    }
  }
}

pub struct NormalMapping
{
  camera: CameraBinding,
  pipeline: wgpu::RenderPipeline,
  surface_bind_group: wgpu::BindGroup,
  surface: wgpu::Buffer,
  tangent: Vec4,

  wall: Mesh,
  wall_instance: InstanceBuffer,

  flat: FlatRenderer,
  markers: LightMarkers,

  toggles: Toggles,

  _diffuse: Texture,
  _normals: Texture,
}

impl Demo for NormalMapping
{
  const TITLE: &'static str = "Normal Mapping";
  const CONTROLS: &'static [(&'static str, &'static str)] = &[("N", "normal map"), ("F", "funky light colour")];

  fn camera_start() -> Vec3
  {
    Vec3::new(0.0, 1.5, 10.0)
  }

  fn new(gpu: &Gpu, ctx: &AppContext) -> anyhow::Result<Self>
  {
    let device = &gpu.device;
    let config = &ctx.config;

    let camera_layout = CameraBinding::layout(device);
    let camera = CameraBinding::new(device, &camera_layout, "Normal Mapping Camera");

    let diffuse = Texture::load_or(device, &gpu.queue, &config.asset_path("textures/brickwall.jpg"), true, || {
      brick_wall(BRICK_IMAGE_SIZE)
    });
    let normals =
      Texture::load_or(device, &gpu.queue, &config.asset_path("textures/brickwall_normal.jpg"), false, || {
        brick_normals(BRICK_IMAGE_SIZE)
      });

    let wall_data = plane(1.0);
    let tangent = surface_tangent(&wall_data).ok_or_else(|| anyhow::anyhow!("wall mesh has no tangent frame"))?;

    let toggles = Toggles::default();
    let surface = uniform_buffer(
      device,
      "Normal Mapping Surface",
      &SurfaceUniform::new(Vec3::ONE, tangent, toggles.normal_map, gpu.format().is_srgb()),
    );

    let surface_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      label: Some("Normal Mapping Surface BGL"),
      entries: &[
        texture_entry(0, wgpu::TextureViewDimension::D2),
        texture_entry(1, wgpu::TextureViewDimension::D2),
        sampler_entry(2),
        uniform_entry(3, wgpu::ShaderStages::VERTEX_FRAGMENT),
      ],
    });

    let surface_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      label: Some("Normal Mapping Surface BG"),
      layout: &surface_layout,
      entries: &[
        wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&diffuse.view) },
        wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&normals.view) },
        wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&diffuse.sampler) },
        wgpu::BindGroupEntry { binding: 3, resource: surface.as_entire_binding() },
      ],
    });

    let shader = create_shader(device, "Normal Map Shader", include_str!("../../shaders/normal_map.wgsl"));
    let pipeline = create_mesh_pipeline(device, &MeshPipelineDesc {
      label: "Normal Mapping Pipeline",
      shader: &shader,
      bind_group_layouts: &[&camera_layout, &surface_layout],
      color_format: gpu.format(),
      blend: Some(wgpu::BlendState::REPLACE),
      depth_stencil: opaque_depth(),
    });

    let flat = FlatRenderer::new(device, &camera_layout, gpu.format());
    let markers = LightMarkers::new(device, &flat, &[LIGHT_POSITION]);

    Ok(Self {
      camera,
      pipeline,
      surface_bind_group,
      surface,
      tangent,
      wall: Mesh::upload(device, "Brick Wall", &wall_data),
      wall_instance: InstanceBuffer::single(device, "Brick Wall Instance", wall_model()),
      flat,
      markers,
      toggles,
      _diffuse: diffuse,
      _normals: normals,
    })
  }

  fn update(&mut self, gpu: &Gpu, ctx: &AppContext)
  {
    let before = self.toggles;
    self.toggles.apply(&ctx.input);

    if self.toggles != before
    {
      log::info!("normal map {}, funky {}", on_off(self.toggles.normal_map), on_off(self.toggles.funky));
    }

    let color = if self.toggles.funky { funky_color(ctx.time()) } else { Vec3::ONE };
    let uniform = SurfaceUniform::new(color, self.tangent, self.toggles.normal_map, gpu.format().is_srgb());
    gpu.queue.write_buffer(&self.surface, 0, bytemuck::bytes_of(&uniform));

    self.markers.update(&gpu.queue, &[LIGHT_POSITION], color);
    self.camera.write(&gpu.queue, &ctx.camera_uniform());
  }

  fn render(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView)
  {
    let mut pass = begin_scene_pass(encoder, "Normal Mapping Pass", target, &gpu.depth.view);

    pass.set_pipeline(&self.pipeline);
    pass.set_bind_group(0, &self.camera.bind_group, &[]);
    pass.set_bind_group(1, &self.surface_bind_group, &[]);
    self.wall.draw(&mut pass, &self.wall_instance);

    self.markers.draw(&mut pass, &self.flat, &self.camera.bind_group);
  }

  fn hud(&self, ui: &mut egui::Ui)
  {
    ui.label(format!("normal map: {}", on_off(self.toggles.normal_map)));
    ui.label(format!("funky colour: {}", on_off(self.toggles.funky)));
  }
}

/// The unit plane stood upright and facing +Z, ten units across.
fn wall_model() -> Mat4
{
  Mat4::from_scale(Vec3::splat(WALL_SCALE)) * Mat4::from_rotation_x(FRAC_PI_2)
}

//
// ──────────────────────────────────────────────────────────────
//   Generated stand-ins
//
//   Running bond: rows of bricks, every other row shifted by
//   half a brick, with mortar along the top and left edges.
// ──────────────────────────────────────────────────────────────
//

const BRICK_IMAGE_SIZE: u32 = 128;
const BRICK_WIDTH: u32 = 32;
const BRICK_HEIGHT: u32 = 16;
const MORTAR: u32 = 2;
const BEVEL: u32 = 3;

/// (row, column) of the brick under a texel.
fn brick_at(x: u32, y: u32) -> (u32, u32)
{
  let row = y / BRICK_HEIGHT;
  let shift = if row % 2 == 1 { BRICK_WIDTH / 2 } else { 0 };
  (row, (x + shift) / BRICK_WIDTH)
}

/// Texels from the nearest mortar line; zero inside the mortar.
fn mortar_distance(x: u32, y: u32) -> u32
{
  let row = y / BRICK_HEIGHT;
  let shift = if row % 2 == 1 { BRICK_WIDTH / 2 } else { 0 };

  let across = (x + shift) % BRICK_WIDTH;
  let down = y % BRICK_HEIGHT;

  if across < MORTAR || down < MORTAR
  {
    return 0;
  }

  (across + 1 - MORTAR).min(BRICK_WIDTH - across).min(down + 1 - MORTAR).min(BRICK_HEIGHT - down)
}

/// Surface height in [0, 1]: mortar at 0, rising over the bevel.
fn height(x: u32, y: u32) -> f32
{
  mortar_distance(x, y).min(BEVEL) as f32 / BEVEL as f32
}

fn brick_wall(size: u32) -> RgbaImage
{
  RgbaImage::from_fn(size, size, |x, y| {
    if mortar_distance(x, y) == 0
    {
      return Rgba([150, 148, 140, 255]);
    }

    let (row, column) = brick_at(x, y);
    let shade = ((row * 7 + column * 13) % 5) as u8 * 8;
    Rgba([140 + shade, 62, 46, 255])
  })
}

/// Tangent-space normals of `height`, packed as `n * 0.5 + 0.5`.
///
/// Green points at the top image row, the usual convention for
/// brick normal maps.
fn brick_normals(size: u32) -> RgbaImage
{
  const STRENGTH: f32 = 2.0;

  let wrap = |v: u32, d: i32| (v as i32 + d).rem_euclid(size as i32) as u32;

  RgbaImage::from_fn(size, size, |x, y| {
    let slope_x = height(wrap(x, 1), y) - height(wrap(x, -1), y);
    let slope_down = height(x, wrap(y, 1)) - height(x, wrap(y, -1));

    let n = Vec3::new(-slope_x * STRENGTH, slope_down * STRENGTH, 1.0).normalize();
    let [r, g, b] = (n * 0.5 + Vec3::splat(0.5)).to_array().map(|c| (c * 255.0).round() as u8);
    Rgba([r, g, b, 255])
  })
}

#[cfg(test)]
mod tests
{
  use super::*;

  fn decode(texel: &Rgba<u8>) -> Vec3
  {
    Vec3::new(texel[0] as f32, texel[1] as f32, texel[2] as f32) / 255.0 * 2.0 - Vec3::ONE
  }

  #[test]
  fn surface_uniform_matches_shader_layout()
  {
    assert_eq!(std::mem::size_of::<SurfaceUniform>(), 80);

    let uniform = SurfaceUniform::new(Vec3::ONE, Vec4::new(1.0, 0.0, 0.0, -1.0), true, false);
    assert_eq!(uniform.light_pos, [2.0, 0.5, 2.0, 1.0]);
    assert_eq!(uniform.terms, [0.05, 0.5, 1.0, 32.0]);
    assert_eq!(uniform.tangent, [1.0, 0.0, 0.0, -1.0]);
    assert_eq!(uniform.settings, [1.0, 0.0, 0.0, 0.0]);
  }

  #[test]
  fn wall_faces_the_camera()
  {
    let model = wall_model();

    let normal = model.transform_vector3(Vec3::Y).normalize();
    assert!(normal.abs_diff_eq(Vec3::Z, 1e-6));

    // Corners of the unit plane end up five units from the centre
    let corner = model.transform_point3(Vec3::new(0.5, 0.0, 0.5));
    assert!(corner.abs_diff_eq(Vec3::new(5.0, -5.0, 0.0), 1e-5));

    // The light sits in front of the wall
    assert!(LIGHT_POSITION.z > 0.0);
  }

  #[test]
  fn flat_brick_faces_straight_out()
  {
    let normals = brick_normals(BRICK_IMAGE_SIZE);

    // Middle of the first brick in the first row
    let texel = normals.get_pixel(BRICK_WIDTH / 2, BRICK_HEIGHT / 2);
    assert_eq!(texel.0, [128, 128, 255, 255]);
    assert!(decode(texel).abs_diff_eq(Vec3::Z, 0.01));
  }

  #[test]
  fn bevels_lean_towards_the_mortar()
  {
    let normals = brick_normals(BRICK_IMAGE_SIZE);
    let middle_y = BRICK_HEIGHT / 2;
    let middle_x = BRICK_WIDTH / 2;

    // Just right of a vertical mortar line
    let left_edge = decode(normals.get_pixel(MORTAR, middle_y));
    assert!(left_edge.x < -0.1);

    // Just left of the next one
    let right_edge = decode(normals.get_pixel(BRICK_WIDTH - 1, middle_y));
    assert!(right_edge.x > 0.1);

    // Just below a horizontal mortar line, which is towards the top row
    let top_edge = decode(normals.get_pixel(middle_x, MORTAR));
    assert!(top_edge.y > 0.1);

    for n in [left_edge, right_edge, top_edge]
    {
      assert!(n.z > 0.0);
    }
  }

  #[test]
  fn odd_rows_are_offset_by_half_a_brick()
  {
    assert_eq!(mortar_distance(0, BRICK_HEIGHT / 2), 0);
    assert_ne!(mortar_distance(0, BRICK_HEIGHT + BRICK_HEIGHT / 2), 0);
    assert_eq!(mortar_distance(BRICK_WIDTH / 2, BRICK_HEIGHT + BRICK_HEIGHT / 2), 0);

    let wall = brick_wall(BRICK_IMAGE_SIZE);
    assert_eq!(wall.get_pixel(0, 0).0, [150, 148, 140, 255]);
    assert_ne!(wall.get_pixel(BRICK_WIDTH / 2, BRICK_HEIGHT / 2).0, [150, 148, 140, 255]);
  }

  #[test]
  fn keys_toggle_normal_map_and_colour()
  {
    let mut toggles = Toggles::default();
    let mut input = InputState::new();

    input.press_key(KeyCode::KeyN);
    toggles.apply(&input);
    assert_eq!(toggles, Toggles { normal_map: false, funky: false });

    input.end_frame();
    input.release_key(KeyCode::KeyN);
    input.press_key(KeyCode::KeyF);
    input.press_key(KeyCode::KeyN);
    toggles.apply(&input);
    assert_eq!(toggles, Toggles { normal_map: true, funky: true });
  }
}
