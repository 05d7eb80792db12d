pub mod asteroids;
pub mod boxes;
pub mod lighting;
pub mod normal_mapping;
pub mod outline;
pub mod post_process;
pub mod reflection;
pub mod scene;

use glam::Vec3;

use crate::context::AppContext;
use crate::renderer::Gpu;

//
// ──────────────────────────────────────────────────────────────
//   Demo interface
//
//   The runner owns the window, GPU, camera and input; a demo
//   only owns its GPU resources. Per frame the runner calls
//   `update` (after the camera moved) and then `render` into the
//   swapchain image, and draws the HUD on top.
// ──────────────────────────────────────────────────────────────
//

pub trait Demo: Sized
{
  const TITLE: &'static str;

  /// Demo-specific keys shown in the HUD, as (key, action).
  const CONTROLS: &'static [(&'static str, &'static str)] = &[];

  fn camera_start() -> Vec3;

  fn new(gpu: &Gpu, ctx: &AppContext) -> anyhow::Result<Self>;

  fn update(&mut self, gpu: &Gpu, ctx: &AppContext);

  fn resize(&mut self, _gpu: &Gpu) {}

  fn render(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView);

  /// Toggle states for the HUD.
  fn hud(&self, _ui: &mut egui::Ui) {}
}

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.1, g: 0.1, b: 0.1, a: 1.0 };

/// Colour + depth/stencil pass clearing both.
pub fn begin_scene_pass<'a>(
  encoder: &'a mut wgpu::CommandEncoder,
  label: &str,
  color: &wgpu::TextureView,
  depth: &wgpu::TextureView,
) -> wgpu::RenderPass<'a>
{
  encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
    label: Some(label),
    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
      view: color,
      resolve_target: None,
      ops: wgpu::Operations { load: wgpu::LoadOp::Clear(CLEAR_COLOR), store: wgpu::StoreOp::Store },
      depth_slice: None,
    })],
    depth_stencil_attachment: Some(crate::renderer::depth::clear_attachment(depth)),
    ..Default::default()
  })
}

pub fn on_off(on: bool) -> &'static str
{
  if on { "on" } else { "off" }
}
