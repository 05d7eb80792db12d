use egui_wgpu::{Renderer, RendererOptions, ScreenDescriptor};
use winit::event::WindowEvent;
use winit::window::Window;

//
// ──────────────────────────────────────────────────────────────
//   HUD overlay
//
//   The HUD is built and painted in one call, loading over the
//   already rendered frame; it has no depth attachment.
// ──────────────────────────────────────────────────────────────
//

pub struct GuiRenderer
{
  context: egui::Context,
  winit_state: egui_winit::State,
  painter: Renderer,
}

impl GuiRenderer
{
  pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Window) -> Self
  {
    let context = egui::Context::default();
    let scale = Some(window.scale_factor() as f32);
    let winit_state =
      egui_winit::State::new(context.clone(), egui::viewport::ViewportId::ROOT, window, scale, None, None);

    let options = RendererOptions {
      depth_stencil_format: None,
      msaa_samples: 1,
      predictable_texture_filtering: false,
      dithering: true,
    };

    Self { context, winit_state, painter: Renderer::new(device, output_format, options) }
  }

  /// True when egui keeps the event, e.g. a click landing on the HUD.
  pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool
  {
    self.winit_state.on_window_event(window, event).consumed
  }

  pub fn wants_pointer(&self) -> bool
  {
    self.context.wants_pointer_input()
  }

  pub fn draw(
    &mut self,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    encoder: &mut wgpu::CommandEncoder,
    window: &Window,
    view: &wgpu::TextureView,
    build: impl FnMut(&egui::Context),
  )
  {
    let input = self.winit_state.take_egui_input(window);
    let output = self.context.run(input, build);
    self.winit_state.handle_platform_output(window, output.platform_output);

    let screen = screen_of(window, output.pixels_per_point);

    for (id, delta) in &output.textures_delta.set
    {
      self.painter.update_texture(device, queue, *id, delta);
    }

    let primitives = self.context.tessellate(output.shapes, output.pixels_per_point);
    self.painter.update_buffers(device, queue, encoder, &primitives, &screen);
    self.paint(encoder, view, &primitives, &screen);

    for id in &output.textures_delta.free
    {
      self.painter.free_texture(id);
    }
  }

  fn paint(
    &self,
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    primitives: &[egui::ClippedPrimitive],
    screen: &ScreenDescriptor,
  )
  {
    let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
      label: Some("HUD Pass"),
      color_attachments: &[Some(wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
        depth_slice: None,
      })],
      ..Default::default()
    });

    // egui-wgpu wants a 'static pass; this one ends with the function
    let mut pass = pass.forget_lifetime();
    self.painter.render(&mut pass, primitives, screen);
  }
}

fn screen_of(window: &Window, pixels_per_point: f32) -> ScreenDescriptor
{
  let size = window.inner_size();
  ScreenDescriptor { size_in_pixels: [size.width, size.height], pixels_per_point }
}
