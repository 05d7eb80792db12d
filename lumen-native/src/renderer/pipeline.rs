use super::mesh::{InstanceRaw, MeshVertex};

//
// ──────────────────────────────────────────────────────────────
//   Pipeline helpers
//
//   Shader and pipeline creation run inside a validation error
//   scope so a broken WGSL file is logged with its label instead
//   of surfacing later as an opaque device error.
// ──────────────────────────────────────────────────────────────
//

pub fn create_shader(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule
{
  validated(device, label, || {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
      label: Some(label),
      source: wgpu::ShaderSource::Wgsl(source.into()),
    })
  })
}

/// Run `build` and log any validation error it raised.
pub fn validated<T>(device: &wgpu::Device, what: &str, build: impl FnOnce() -> T) -> T
{
  device.push_error_scope(wgpu::ErrorFilter::Validation);
  let out = build();

  if let Some(err) = pollster::block_on(device.pop_error_scope())
  {
    log::error!("{what} failed validation: {err}");
  }

  out
}

pub struct MeshPipelineDesc<'a>
{
  pub label: &'a str,
  pub shader: &'a wgpu::ShaderModule,
  pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
  pub color_format: wgpu::TextureFormat,
  pub blend: Option<wgpu::BlendState>,
  pub depth_stencil: wgpu::DepthStencilState,
}

/// Pipeline over `MeshVertex` + per-instance model matrices, `vs_main` / `fs_main`.
pub fn create_mesh_pipeline(device: &wgpu::Device, desc: &MeshPipelineDesc<'_>) -> wgpu::RenderPipeline
{
  create_pipeline(device, desc, &[MeshVertex::layout(), InstanceRaw::layout()])
}

pub fn create_pipeline(
  device: &wgpu::Device,
  desc: &MeshPipelineDesc<'_>,
  buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline
{
  validated(device, desc.label, || {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
      label: Some(desc.label),
      bind_group_layouts: desc.bind_group_layouts,
      push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
      label: Some(desc.label),
      layout: Some(&layout),
      vertex: wgpu::VertexState {
        module: desc.shader,
        entry_point: Some("vs_main"),
        buffers,
        compilation_options: wgpu::PipelineCompilationOptions::default(),
      },
      fragment: Some(wgpu::FragmentState {
        module: desc.shader,
        entry_point: Some("fs_main"),
        targets: &[Some(wgpu::ColorTargetState {
          format: desc.color_format,
          blend: desc.blend,
          write_mask: wgpu::ColorWrites::ALL,
        })],
        compilation_options: wgpu::PipelineCompilationOptions::default(),
      }),
      // Cube-face captures flip Y, which flips winding; draw both sides
      primitive: wgpu::PrimitiveState { cull_mode: None, ..Default::default() },
      depth_stencil: Some(desc.depth_stencil.clone()),
      multisample: wgpu::MultisampleState::default(),
      multiview: None,
      cache: None,
    })
  })
}

//
// ──────────────────────────────────────────────────────────────
//   Bind group layout entries
// ──────────────────────────────────────────────────────────────
//

pub fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry
{
  wgpu::BindGroupLayoutEntry {
    binding,
    visibility,
    ty: wgpu::BindingType::Buffer {
      ty: wgpu::BufferBindingType::Uniform,
      has_dynamic_offset: false,
      min_binding_size: None,
    },
    count: None,
  }
}

pub fn texture_entry(binding: u32, dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry
{
  wgpu::BindGroupLayoutEntry {
    binding,
    visibility: wgpu::ShaderStages::FRAGMENT,
    ty: wgpu::BindingType::Texture {
      sample_type: wgpu::TextureSampleType::Float { filterable: true },
      view_dimension: dimension,
      multisampled: false,
    },
    count: None,
  }
}

pub fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry
{
  wgpu::BindGroupLayoutEntry {
    binding,
    visibility: wgpu::ShaderStages::FRAGMENT,
    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
    count: None,
  }
}

pub fn uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer
{
  use wgpu::util::DeviceExt;

  device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
    label: Some(label),
    contents: bytemuck::bytes_of(value),
    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
  })
}
