use wgpu::CompareFunction;

use super::depth::depth_state;
use super::mesh::{cube, Mesh, MeshVertex};
use super::pipeline::{create_pipeline, create_shader, sampler_entry, texture_entry, MeshPipelineDesc};
use super::texture::CubeTexture;

//
// ──────────────────────────────────────────────────────────────
//   Skybox
//
//   Drawn first with depth writes off; it lands on the far plane
//   (depth 1.0), so `LessEqual` lets it through a cleared buffer
//   and everything drawn later wins.
// ──────────────────────────────────────────────────────────────
//

pub struct Skybox
{
  pipeline: wgpu::RenderPipeline,
  bind_group: wgpu::BindGroup,
  mesh: Mesh,
}

impl Skybox
{
  pub fn new(
    device: &wgpu::Device,
    camera_layout: &wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
    sky: &CubeTexture,
  ) -> Self
  {
    let shader = create_shader(device, "Skybox Shader", include_str!("../../shaders/skybox.wgsl"));

    let layout = environment_layout(device, "Skybox BGL");
    let bind_group = environment_bind_group(device, &layout, "Skybox BG", sky);

    let pipeline = create_pipeline(
      device,
      &MeshPipelineDesc {
        label: "Skybox Pipeline",
        shader: &shader,
        bind_group_layouts: &[camera_layout, &layout],
        color_format,
        blend: Some(wgpu::BlendState::REPLACE),
        depth_stencil: depth_state(false, CompareFunction::LessEqual, wgpu::StencilState::default()),
      },
      &[MeshVertex::position_layout()],
    );

    let mesh = Mesh::upload(device, "Skybox", &cube());

    Self { pipeline, bind_group, mesh }
  }

  pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera: &wgpu::BindGroup)
  {
    pass.set_pipeline(&self.pipeline);
    pass.set_bind_group(0, camera, &[]);
    pass.set_bind_group(1, &self.bind_group, &[]);
    self.mesh.draw_single(pass);
  }
}

/// Cube texture + sampler at bindings 0 and 1; shared with the reflect pipeline.
pub fn environment_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout
{
  device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
    label: Some(label),
    entries: &[texture_entry(0, wgpu::TextureViewDimension::Cube), sampler_entry(1)],
  })
}

pub fn environment_bind_group(
  device: &wgpu::Device,
  layout: &wgpu::BindGroupLayout,
  label: &str,
  cube: &CubeTexture,
) -> wgpu::BindGroup
{
  device.create_bind_group(&wgpu::BindGroupDescriptor {
    label: Some(label),
    layout,
    entries: &[
      wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&cube.view) },
      wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&cube.sampler) },
    ],
  })
}
