use lumen_core::lighting::LightRig;

use super::depth::opaque_depth;
use super::lights::{LightsUniform, ShadingSettings};
use super::pipeline::{
  create_mesh_pipeline, create_shader, sampler_entry, texture_entry, uniform_buffer, uniform_entry,
  MeshPipelineDesc,
};
use super::texture::Texture;

//
// ──────────────────────────────────────────────────────────────
//   Lit (Phong) renderer
//
//   Bind groups:
//     0  camera        (owned by the demo)
//     1  light rig     (one per renderer)
//     2  material      (diffuse, specular, emission, params)
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams
{
  pub shininess: f32,
  pub emission_strength: f32,
  /// Fragments with diffuse alpha below this are discarded.
  pub alpha_cutoff: f32,
}

impl Default for MaterialParams
{
  fn default() -> Self
  {
    Self { shininess: 32.0, emission_strength: 0.0, alpha_cutoff: 0.1 }
  }
}

impl MaterialParams
{
  fn to_uniform(self) -> [f32; 4]
  {
    [self.shininess, self.emission_strength, self.alpha_cutoff, 0.0]
  }
}

pub struct Material
{
  pub params: MaterialParams,
  buffer: wgpu::Buffer,
  pub bind_group: wgpu::BindGroup,
}

impl Material
{
  pub fn set_params(&mut self, queue: &wgpu::Queue, params: MaterialParams)
  {
    self.params = params;
    queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&params.to_uniform()));
  }
}

pub struct LitRenderer
{
  pub pipeline: wgpu::RenderPipeline,
  shader: wgpu::ShaderModule,

  lights_layout: wgpu::BindGroupLayout,
  material_layout: wgpu::BindGroupLayout,

  lights_buffer: wgpu::Buffer,
  lights_bind_group: wgpu::BindGroup,
}

impl LitRenderer
{
  pub fn new(device: &wgpu::Device, camera_layout: &wgpu::BindGroupLayout, color_format: wgpu::TextureFormat) -> Self
  {
    let shader = create_shader(device, "Lit Shader", include_str!("../../shaders/lit.wgsl"));

    let lights_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      label: Some("Lights BGL"),
      entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
    });

    let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      label: Some("Material BGL"),
      entries: &[
        texture_entry(0, wgpu::TextureViewDimension::D2),
        texture_entry(1, wgpu::TextureViewDimension::D2),
        texture_entry(2, wgpu::TextureViewDimension::D2),
        sampler_entry(3),
        uniform_entry(4, wgpu::ShaderStages::FRAGMENT),
      ],
    });

    let lights_buffer = uniform_buffer(device, "Lights Buffer", &LightsUniform::new(
      &LightRig::default(),
      ShadingSettings { gamma_correction: true, surface_srgb: color_format.is_srgb() },
    ));

    let lights_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      label: Some("Lights BG"),
      layout: &lights_layout,
      entries: &[wgpu::BindGroupEntry { binding: 0, resource: lights_buffer.as_entire_binding() }],
    });

    let pipeline = lit_pipeline(
      device,
      &shader,
      &[camera_layout, &lights_layout, &material_layout],
      "Lit Pipeline",
      color_format,
      opaque_depth(),
    );

    Self { pipeline, shader, lights_layout, material_layout, lights_buffer, lights_bind_group }
  }

  /// Same shader and layouts with different target or depth/stencil state.
  pub fn variant(
    &self,
    device: &wgpu::Device,
    camera_layout: &wgpu::BindGroupLayout,
    label: &str,
    color_format: wgpu::TextureFormat,
    depth_stencil: wgpu::DepthStencilState,
  ) -> wgpu::RenderPipeline
  {
    lit_pipeline(
      device,
      &self.shader,
      &[camera_layout, &self.lights_layout, &self.material_layout],
      label,
      color_format,
      depth_stencil,
    )
  }

  pub fn material(
    &self,
    device: &wgpu::Device,
    label: &str,
    diffuse: &Texture,
    specular: &Texture,
    emission: &Texture,
    params: MaterialParams,
  ) -> Material
  {
    let buffer = uniform_buffer(device, label, &params.to_uniform());

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      label: Some(label),
      layout: &self.material_layout,
      entries: &[
        wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&diffuse.view) },
        wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&specular.view) },
        wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(&emission.view) },
        wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::Sampler(&diffuse.sampler) },
        wgpu::BindGroupEntry { binding: 4, resource: buffer.as_entire_binding() },
      ],
    });

    Material { params, buffer, bind_group }
  }

  pub fn write_lights(&self, queue: &wgpu::Queue, rig: &LightRig, settings: ShadingSettings)
  {
    queue.write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(&LightsUniform::new(rig, settings)));
  }

  /// Bind `pipeline`, the camera and the light rig; materials are bound per draw.
  pub fn begin(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &wgpu::RenderPipeline, camera: &wgpu::BindGroup)
  {
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, camera, &[]);
    pass.set_bind_group(1, &self.lights_bind_group, &[]);
  }
}

fn lit_pipeline(
  device: &wgpu::Device,
  shader: &wgpu::ShaderModule,
  bind_group_layouts: &[&wgpu::BindGroupLayout],
  label: &str,
  color_format: wgpu::TextureFormat,
  depth_stencil: wgpu::DepthStencilState,
) -> wgpu::RenderPipeline
{
  create_mesh_pipeline(device, &MeshPipelineDesc {
    label,
    shader,
    bind_group_layouts,
    color_format,
    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
    depth_stencil,
  })
}
