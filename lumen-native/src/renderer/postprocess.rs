use lumen_core::kernel::{KernelEffect, SAMPLE_OFFSET};

use super::pipeline::{create_shader, sampler_entry, texture_entry, uniform_buffer, uniform_entry, validated};
use super::target::ColorTarget;

//
// ──────────────────────────────────────────────────────────────
//   Kernel Uniform (GPU side)
//
//   WGSL layout (kernel.wgsl):
//     rows   : array<vec4<f32>, 3>  → 48 bytes (w unused)
//     offset : vec4<f32>            → 16 bytes (x = tap spacing)
//   Total: 64 bytes
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KernelUniform
{
  pub rows: [[f32; 4]; 3],
  pub offset: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<KernelUniform>() == 64);

impl KernelUniform
{
  pub fn from_effect(effect: KernelEffect) -> Self
  {
    let w = effect.weights();
    let row = |r: [f32; 3]| [r[0], r[1], r[2], 0.0];

    Self { rows: [row(w[0]), row(w[1]), row(w[2])], offset: [SAMPLE_OFFSET, 0.0, 0.0, 0.0] }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Kernel pass
//
//   The scene renders into `scene`; `render` then draws one
//   full-screen triangle into the swapchain image, convolving
//   the scene with the current kernel.
// ──────────────────────────────────────────────────────────────
//

pub struct KernelPass
{
  pub scene: ColorTarget,
  pub effect: KernelEffect,

  format: wgpu::TextureFormat,
  pipeline: wgpu::RenderPipeline,
  layout: wgpu::BindGroupLayout,
  uniform: wgpu::Buffer,
  bind_group: wgpu::BindGroup,
}

impl KernelPass
{
  pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self
  {
    let effect = KernelEffect::Identity;
    let shader = create_shader(device, "Kernel Shader", include_str!("../../shaders/kernel.wgsl"));

    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      label: Some("Kernel BGL"),
      entries: &[
        texture_entry(0, wgpu::TextureViewDimension::D2),
        sampler_entry(1),
        uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
      ],
    });

    let pipeline = create_kernel_pipeline(device, &shader, &layout, format);
    let uniform = uniform_buffer(device, "Kernel Buffer", &KernelUniform::from_effect(effect));

    let scene = ColorTarget::new(device, "Scene Target", format, width, height);
    let bind_group = create_bind_group(device, &layout, &scene, &uniform);

    Self { scene, effect, format, pipeline, layout, uniform, bind_group }
  }

  pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32)
  {
    self.scene = ColorTarget::new(device, "Scene Target", self.format, width, height);
    self.bind_group = create_bind_group(device, &self.layout, &self.scene, &self.uniform);
  }

  pub fn set_effect(&mut self, queue: &wgpu::Queue, effect: KernelEffect)
  {
    if effect == self.effect
    {
      return;
    }

    log::info!("Post-process kernel: {}", effect.name());
    self.effect = effect;
    queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&KernelUniform::from_effect(effect)));
  }

  pub fn render(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView)
  {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
      label: Some("Kernel Pass"),
      color_attachments: &[Some(wgpu::RenderPassColorAttachment {
        view: output,
        resolve_target: None,
        ops: wgpu::Operations { load: wgpu::LoadOp::Clear(wgpu::Color::BLACK), store: wgpu::StoreOp::Store },
        depth_slice: None,
      })],
      ..Default::default()
    });

    pass.set_pipeline(&self.pipeline);
    pass.set_bind_group(0, &self.bind_group, &[]);
    pass.draw(0..3, 0..1);
  }
}

fn create_bind_group(
  device: &wgpu::Device,
  layout: &wgpu::BindGroupLayout,
  scene: &ColorTarget,
  uniform: &wgpu::Buffer,
) -> wgpu::BindGroup
{
  device.create_bind_group(&wgpu::BindGroupDescriptor {
    label: Some("Kernel BG"),
    layout,
    entries: &[
      wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&scene.view) },
      wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&scene.sampler) },
      wgpu::BindGroupEntry { binding: 2, resource: uniform.as_entire_binding() },
    ],
  })
}

fn create_kernel_pipeline(
  device: &wgpu::Device,
  shader: &wgpu::ShaderModule,
  layout: &wgpu::BindGroupLayout,
  format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline
{
  validated(device, "Kernel Pipeline", || {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
      label: Some("Kernel Pipeline Layout"),
      bind_group_layouts: &[layout],
      push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
      label: Some("Kernel Pipeline"),
      layout: Some(&pipeline_layout),
      vertex: wgpu::VertexState {
        module: shader,
        entry_point: Some("vs_main"),
        buffers: &[],
        compilation_options: wgpu::PipelineCompilationOptions::default(),
      },
      fragment: Some(wgpu::FragmentState {
        module: shader,
        entry_point: Some("fs_main"),
        targets: &[Some(wgpu::ColorTargetState {
          format,
          blend: Some(wgpu::BlendState::REPLACE),
          write_mask: wgpu::ColorWrites::ALL,
        })],
        compilation_options: wgpu::PipelineCompilationOptions::default(),
      }),
      primitive: wgpu::PrimitiveState::default(),
      depth_stencil: None,
      multisample: wgpu::MultisampleState::default(),
      multiview: None,
      cache: None,
    })
  })
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn uniform_rows_match_kernel()
  {
    let uniform = KernelUniform::from_effect(KernelEffect::Emboss);

    assert_eq!(uniform.rows[0], [-2.0, -1.0, 0.0, 0.0]);
    assert_eq!(uniform.rows[2], [0.0, 1.0, 2.0, 0.0]);
    assert_eq!(uniform.offset[0], SAMPLE_OFFSET);
  }
}
