use glam::{Mat4, Quat, Vec3};
use image::{Rgba, RgbaImage};
use winit::keyboard::KeyCode;

use super::{begin_scene_pass, Demo};
use crate::camera::CameraBinding;
use crate::context::AppContext;
use crate::renderer::depth::opaque_depth;
use crate::renderer::mesh::cube;
use crate::renderer::pipeline::{
  create_mesh_pipeline, create_shader, sampler_entry, texture_entry, uniform_buffer, uniform_entry,
  MeshPipelineDesc,
};
use crate::renderer::texture::disc;
use crate::renderer::{Gpu, InstanceBuffer, Mesh, Texture};

//
// ──────────────────────────────────────────────────────────────
//   Boxes: free-fly camera over ten spinning textured cubes.
//   Up/Down fade the overlay texture in and out.
// ──────────────────────────────────────────────────────────────
//

const BOX_POSITIONS: [Vec3; 10] = [
  Vec3::new(0.0, 0.0, 0.0),
  Vec3::new(2.0, 5.0, -15.0),
  Vec3::new(-1.5, -2.2, -2.5),
  Vec3::new(-3.8, -2.0, -12.3),
  Vec3::new(2.4, -0.4, -3.5),
  Vec3::new(-1.7, 3.0, -7.5),
  Vec3::new(1.3, -2.0, -2.5),
  Vec3::new(1.5, 2.0, -2.5),
  Vec3::new(1.5, 0.2, -1.5),
  Vec3::new(-1.3, 1.0, -1.5),
];

const VISIBILITY_STEP: f32 = 0.01;
const INITIAL_VISIBILITY: f32 = 0.2;

pub struct Boxes
{
  camera: CameraBinding,
  pipeline: wgpu::RenderPipeline,
  textures_bind_group: wgpu::BindGroup,
  params: wgpu::Buffer,

  cube: Mesh,
  instances: InstanceBuffer,

  visibility: f32,

  _base: Texture,
  _overlay: Texture,
}

impl Demo for Boxes
{
  const TITLE: &'static str = "Boxes";
  const CONTROLS: &'static [(&'static str, &'static str)] = &[("Up / Down", "overlay visibility")];

  fn camera_start() -> Vec3
  {
    Vec3::new(0.0, 0.0, 3.0)
  }

  fn new(gpu: &Gpu, ctx: &AppContext) -> anyhow::Result<Self>
  {
    let device = &gpu.device;
    let config = &ctx.config;

    let camera_layout = CameraBinding::layout(device);
    let camera = CameraBinding::new(device, &camera_layout, "Boxes Camera");

    let base = Texture::load_or(device, &gpu.queue, &config.asset_path("textures/container.jpg"), true, planks);
    let overlay = Texture::load_or(device, &gpu.queue, &config.asset_path("textures/awesomeface.png"), true, || {
      disc(64, [240, 200, 40, 255])
    });

    let visibility = INITIAL_VISIBILITY;
    let params = uniform_buffer(device, "Boxes Params", &[visibility, 0.0, 0.0, 0.0]);

    let textures_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      label: Some("Boxes Textures BGL"),
      entries: &[
        texture_entry(0, wgpu::TextureViewDimension::D2),
        texture_entry(1, wgpu::TextureViewDimension::D2),
        sampler_entry(2),
        uniform_entry(3, wgpu::ShaderStages::FRAGMENT),
      ],
    });

    let textures_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      label: Some("Boxes Textures BG"),
      layout: &textures_layout,
      entries: &[
        wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&base.view) },
        wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&overlay.view) },
        wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&base.sampler) },
        wgpu::BindGroupEntry { binding: 3, resource: params.as_entire_binding() },
      ],
    });

    let shader = create_shader(device, "Textured Shader", include_str!("../../shaders/textured.wgsl"));
    let pipeline = create_mesh_pipeline(device, &MeshPipelineDesc {
      label: "Boxes Pipeline",
      shader: &shader,
      bind_group_layouts: &[&camera_layout, &textures_layout],
      color_format: gpu.format(),
      blend: Some(wgpu::BlendState::REPLACE),
      depth_stencil: opaque_depth(),
    });

    Ok(Self {
      camera,
      pipeline,
      textures_bind_group,
      params,
      cube: Mesh::upload(device, "Box", &cube()),
      instances: InstanceBuffer::from_matrices(device, "Box Instances", &box_models(0.0)),
      visibility,
      _base: base,
      _overlay: overlay,
    })
  }

  fn update(&mut self, gpu: &Gpu, ctx: &AppContext)
  {
    let up = ctx.input.is_held(KeyCode::ArrowUp);
    let down = ctx.input.is_held(KeyCode::ArrowDown);
    let visibility = step_visibility(self.visibility, up, down);

    if visibility != self.visibility
    {
      self.visibility = visibility;
      gpu.queue.write_buffer(&self.params, 0, bytemuck::bytes_of(&[visibility, 0.0f32, 0.0, 0.0]));
    }

    self.camera.write(&gpu.queue, &ctx.camera_uniform());
    self.instances.write(&gpu.queue, &box_models(ctx.time()));
  }

  fn render(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView)
  {
    let mut pass = begin_scene_pass(encoder, "Boxes Pass", target, &gpu.depth.view);

    pass.set_pipeline(&self.pipeline);
    pass.set_bind_group(0, &self.camera.bind_group, &[]);
    pass.set_bind_group(1, &self.textures_bind_group, &[]);
    self.cube.draw(&mut pass, &self.instances);
  }

  fn hud(&self, ui: &mut egui::Ui)
  {
    ui.label(format!("overlay visibility {:.2}", self.visibility));
  }
}

/// One step per frame while a key is held; both keys cancel out.
fn step_visibility(visibility: f32, up: bool, down: bool) -> f32
{
  let mut v = visibility;

  if up
  {
    v += VISIBILITY_STEP;
  }

  if down
  {
    v -= VISIBILITY_STEP;
  }

  v.clamp(0.0, 1.0)
}

/// Box `i` spins at `i + 1` rad/s about (sin(i+1), sin(i+1), sin(i+1)).
fn box_models(time: f32) -> Vec<Mat4>
{
  BOX_POSITIONS
    .iter()
    .enumerate()
    .map(|(i, position)| {
      let rate = (i + 1) as f32;
      let axis = Vec3::splat(rate.sin()).normalize();
      let rotation = Quat::from_axis_angle(axis, time * rate);

      Mat4::from_translation(*position) * Mat4::from_quat(rotation)
    })
    .collect()
}

fn planks() -> RgbaImage
{
  RgbaImage::from_fn(64, 64, |_, y| if y % 16 < 2 { Rgba([90, 60, 30, 255]) } else { Rgba([170, 120, 70, 255]) })
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn visibility_steps_and_clamps()
  {
    assert!((step_visibility(0.5, true, false) - 0.51).abs() < 1e-6);
    assert!((step_visibility(0.5, false, true) - 0.49).abs() < 1e-6);
    assert!((step_visibility(0.5, true, true) - 0.5).abs() < 1e-6);
    assert_eq!(step_visibility(0.995, true, false), 1.0);
    assert_eq!(step_visibility(0.005, false, true), 0.0);
  }

  #[test]
  fn boxes_sit_at_their_positions()
  {
    let models = box_models(3.7);

    assert_eq!(models.len(), BOX_POSITIONS.len());
    for (model, position) in models.iter().zip(BOX_POSITIONS)
    {
      assert!(model.w_axis.truncate().abs_diff_eq(position, 1e-6));
    }
  }

  #[test]
  fn boxes_start_unrotated_and_spin_at_their_rate()
  {
    for model in box_models(0.0)
    {
      assert!(Mat4::from_translation(model.w_axis.truncate()).abs_diff_eq(model, 1e-6));
    }

    // Box 1 turns twice as fast as box 0
    let t = 0.25;
    let (_, r0, _) = box_models(t)[0].to_scale_rotation_translation();
    let (_, r1, _) = box_models(t)[1].to_scale_rotation_translation();
    assert!((r0.to_axis_angle().1 - t).abs() < 1e-4);
    assert!((r1.to_axis_angle().1 - 2.0 * t).abs() < 1e-4);
  }
}
