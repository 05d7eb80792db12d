use lumen_core::cube_faces::CubeFace;

use super::depth::DepthStencil;
use super::texture::{create_sampler, CubeTexture};

//
// ──────────────────────────────────────────────────────────────
//   Offscreen render targets
// ──────────────────────────────────────────────────────────────
//

/// Window-sized colour + depth target that a later pass samples.
pub struct ColorTarget
{
  pub texture: wgpu::Texture,
  pub view: wgpu::TextureView,
  pub sampler: wgpu::Sampler,
  pub depth: DepthStencil,
}

impl ColorTarget
{
  pub fn new(device: &wgpu::Device, label: &str, format: wgpu::TextureFormat, width: u32, height: u32) -> Self
  {
    let (width, height) = (width.max(1), height.max(1));

    let texture = device.create_texture(&wgpu::TextureDescriptor {
      label: Some(label),
      size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
      mip_level_count: 1,
      sample_count: 1,
      dimension: wgpu::TextureDimension::D2,
      format,
      usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
      view_formats: &[],
    });

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = create_sampler(device, label, wgpu::AddressMode::ClampToEdge);
    let depth = DepthStencil::create(device, width, height, &format!("{label} Depth"));

    Self { texture, view, sampler, depth }
  }
}

/// Cube map rendered one face at a time, then sampled as a cube.
pub struct CubeCapture
{
  pub cube: CubeTexture,
  pub depth: DepthStencil,
  pub size: u32,
  face_views: Vec<wgpu::TextureView>,
}

impl CubeCapture
{
  pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: u32) -> Self
  {
    let size = size.max(1);

    let texture = device.create_texture(&wgpu::TextureDescriptor {
      label: Some("Reflection Capture"),
      size: wgpu::Extent3d { width: size, height: size, depth_or_array_layers: 6 },
      mip_level_count: 1,
      sample_count: 1,
      dimension: wgpu::TextureDimension::D2,
      format,
      usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
      view_formats: &[],
    });

    let face_views = CubeFace::ALL
      .iter()
      .map(|face| {
        texture.create_view(&wgpu::TextureViewDescriptor {
          label: Some(&format!("Reflection Capture {}", face.label())),
          dimension: Some(wgpu::TextureViewDimension::D2),
          base_array_layer: face.layer(),
          array_layer_count: Some(1),
          ..Default::default()
        })
      })
      .collect();

    let cube = CubeTexture::wrap(device, "Reflection Capture", texture);
    let depth = DepthStencil::create(device, size, size, "Reflection Capture Depth");

    Self { cube, depth, size, face_views }
  }

  pub fn face_view(&self, face: CubeFace) -> &wgpu::TextureView
  {
    &self.face_views[face.layer() as usize]
  }
}
