use glam::Vec4;

use super::depth::opaque_depth;
use super::pipeline::{create_mesh_pipeline, create_shader, uniform_buffer, uniform_entry, MeshPipelineDesc};

/// Unlit single-colour geometry (light markers, outlines).
pub struct FlatRenderer
{
  pub pipeline: wgpu::RenderPipeline,
  color_layout: wgpu::BindGroupLayout,
}

pub struct FlatColor
{
  buffer: wgpu::Buffer,
  pub bind_group: wgpu::BindGroup,
}

impl FlatColor
{
  pub fn set(&self, queue: &wgpu::Queue, rgba: Vec4)
  {
    queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&rgba.to_array()));
  }
}

impl FlatRenderer
{
  pub fn new(device: &wgpu::Device, camera_layout: &wgpu::BindGroupLayout, color_format: wgpu::TextureFormat) -> Self
  {
    Self::with_depth_stencil(device, camera_layout, "Flat Pipeline", color_format, opaque_depth())
  }

  /// Same shader with its own depth/stencil state, e.g. for stencil-masked outlines.
  pub fn with_depth_stencil(
    device: &wgpu::Device,
    camera_layout: &wgpu::BindGroupLayout,
    label: &str,
    color_format: wgpu::TextureFormat,
    depth_stencil: wgpu::DepthStencilState,
  ) -> Self
  {
    let shader = create_shader(device, "Flat Shader", include_str!("../../shaders/flat.wgsl"));

    let color_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      label: Some("Flat Color BGL"),
      entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
    });

    let pipeline = flat_pipeline(device, &shader, camera_layout, &color_layout, label, color_format, depth_stencil);

    Self { pipeline, color_layout }
  }

  pub fn color(&self, device: &wgpu::Device, label: &str, rgba: Vec4) -> FlatColor
  {
    let buffer = uniform_buffer(device, label, &rgba.to_array());

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      label: Some(label),
      layout: &self.color_layout,
      entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
    });

    FlatColor { buffer, bind_group }
  }
}

fn flat_pipeline(
  device: &wgpu::Device,
  shader: &wgpu::ShaderModule,
  camera_layout: &wgpu::BindGroupLayout,
  color_layout: &wgpu::BindGroupLayout,
  label: &str,
  color_format: wgpu::TextureFormat,
  depth_stencil: wgpu::DepthStencilState,
) -> wgpu::RenderPipeline
{
  create_mesh_pipeline(device, &MeshPipelineDesc {
    label,
    shader,
    bind_group_layouts: &[camera_layout, color_layout],
    color_format,
    blend: Some(wgpu::BlendState::REPLACE),
    depth_stencil,
  })
}
