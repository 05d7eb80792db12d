use std::sync::Arc;

use anyhow::Context;
use winit::window::Window;

use super::depth::DepthStencil;

/// Surface, device and the window-sized depth buffer.
pub struct Gpu
{
  pub surface: wgpu::Surface<'static>,
  pub device: wgpu::Device,
  pub queue: wgpu::Queue,
  pub config: wgpu::SurfaceConfiguration,
  pub depth: DepthStencil,
}

//
// ──────────────────────────────────────────────────────────────
//   Public API
// ──────────────────────────────────────────────────────────────
//

impl Gpu
{
  pub async fn new(window: Arc<Window>, vsync: bool) -> anyhow::Result<Self>
  {
    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone()).context("Failed to create surface")?;

    let adapter = request_adapter(&instance, &surface).await?;
    let info = adapter.get_info();
    log::info!("Using adapter {} ({:?})", info.name, info.backend);

    let (device, queue) = request_device(&adapter).await?;

    let config = configure_surface(&window, &surface, &adapter, &device, vsync)?;
    let depth = DepthStencil::create(&device, config.width, config.height, "Depth Texture");

    Ok(Self { surface, device, queue, config, depth })
  }

  pub fn format(&self) -> wgpu::TextureFormat
  {
    self.config.format
  }

  pub fn size(&self) -> (u32, u32)
  {
    (self.config.width, self.config.height)
  }

  pub fn resize(&mut self, width: u32, height: u32)
  {
    if width == 0 || height == 0
    {
      return;
    }

    self.config.width = width;
    self.config.height = height;
    self.surface.configure(&self.device, &self.config);
    self.depth = DepthStencil::create(&self.device, width, height, "Depth Texture");
  }

  /// Next swapchain image, or None when this frame should be skipped.
  pub fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture>
  {
    match self.surface.get_current_texture()
    {
      Ok(frame) => Some(frame),

      Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) =>
      {
        log::debug!("Surface lost or outdated, reconfiguring");
        self.surface.configure(&self.device, &self.config);

        match self.surface.get_current_texture()
        {
          Ok(frame) => Some(frame),
          Err(err) =>
          {
            log::warn!("Skipping frame after reconfigure: {err}");
            None
          }
        }
      }

      Err(wgpu::SurfaceError::Timeout) =>
      {
        log::debug!("Surface acquire timed out, skipping frame");
        None
      }

      Err(err) =>
      {
        log::error!("Failed to acquire frame: {err}");
        None
      }
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Initialization Helpers
// ──────────────────────────────────────────────────────────────
//

async fn request_adapter(instance: &wgpu::Instance, surface: &wgpu::Surface<'_>) -> anyhow::Result<wgpu::Adapter>
{
  instance
    .request_adapter(&wgpu::RequestAdapterOptions {
      power_preference: wgpu::PowerPreference::HighPerformance,
      compatible_surface: Some(surface),
      force_fallback_adapter: false,
    })
    .await
    .context("No suitable GPU adapters found")
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)>
{
  adapter
    .request_device(&wgpu::DeviceDescriptor { label: Some("Lumen Device"), ..Default::default() })
    .await
    .context("Failed to create device")
}

fn configure_surface(
  window: &Window,
  surface: &wgpu::Surface<'_>,
  adapter: &wgpu::Adapter,
  device: &wgpu::Device,
  vsync: bool,
) -> anyhow::Result<wgpu::SurfaceConfiguration>
{
  let size = window.inner_size();
  let caps = surface.get_capabilities(adapter);

  // Lighting is computed in linear space; an sRGB target does the encoding
  let format = caps
    .formats
    .iter()
    .copied()
    .find(|f| f.is_srgb())
    .or_else(|| caps.formats.first().copied())
    .context("Surface reports no supported formats")?;

  let present_mode = if vsync { wgpu::PresentMode::Fifo } else { wgpu::PresentMode::AutoNoVsync };

  let config = wgpu::SurfaceConfiguration {
    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
    format,
    width: size.width.max(1),
    height: size.height.max(1),
    present_mode,
    alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
    view_formats: vec![],
    desired_maximum_frame_latency: 2,
  };

  surface.configure(device, &config);
  log::info!("Surface configured: {:?}, {}x{}, {:?}", format, config.width, config.height, present_mode);

  Ok(config)
}
