use wgpu::*;

/// Shared by every pass; the stencil aspect is only used by the outline demo.
pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth24PlusStencil8;

pub struct DepthStencil
{
  pub view: TextureView,
}

impl DepthStencil
{
  pub fn create(device: &Device, width: u32, height: u32, label: &str) -> Self
  {
    let texture = device.create_texture(&TextureDescriptor {
      label: Some(label),
      size: Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
      mip_level_count: 1,
      sample_count: 1,
      dimension: TextureDimension::D2,
      format: DEPTH_FORMAT,
      usage: TextureUsages::RENDER_ATTACHMENT,
      view_formats: &[],
    });

    let view = texture.create_view(&TextureViewDescriptor::default());

    Self { view }
  }
}

/// Clears depth to 1.0 and stencil to 0.
pub fn clear_attachment(view: &TextureView) -> RenderPassDepthStencilAttachment<'_>
{
  RenderPassDepthStencilAttachment {
    view,
    depth_ops: Some(Operations { load: LoadOp::Clear(1.0), store: StoreOp::Store }),
    stencil_ops: Some(Operations { load: LoadOp::Clear(0), store: StoreOp::Store }),
  }
}

/// Standard opaque geometry: depth test `Less`, depth write on, stencil untouched.
pub fn opaque_depth() -> DepthStencilState
{
  depth_state(true, CompareFunction::Less, StencilState::default())
}

pub fn depth_state(write: bool, compare: CompareFunction, stencil: StencilState) -> DepthStencilState
{
  DepthStencilState {
    format: DEPTH_FORMAT,
    depth_write_enabled: write,
    depth_compare: compare,
    stencil,
    bias: DepthBiasState::default(),
  }
}
