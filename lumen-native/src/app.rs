use std::sync::Arc;

use anyhow::Context;
use lumen_core::LumenConfig;
use winit::{
  application::ApplicationHandler,
  dpi::LogicalSize,
  event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::KeyCode,
  window::{CursorGrabMode, Window, WindowId},
};

use crate::context::AppContext;
use crate::demos::{on_off, Demo};
use crate::renderer::gui::GuiRenderer;
use crate::renderer::Gpu;

const DEFAULT_LOG_FILTER: &str = "info,wgpu_hal=off,naga=warn";

/// Entry point for every demo binary: set up logging, run, exit non-zero on failure.
pub fn launch<D: Demo>()
{
  // RUST_LOG overrides the default filter, e.g. RUST_LOG=wgpu=debug
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();

  if let Err(err) = run::<D>()
  {
    log::error!("{}: {err:#}", D::TITLE);
    std::process::exit(1);
  }
}

pub fn run<D: Demo>() -> anyhow::Result<()>
{
  let config = LumenConfig::load().context("Failed to load configuration")?;

  let event_loop = EventLoop::new().context("Failed to create event loop")?;
  let mut app = LumenApp::<D>::new(config);

  event_loop.run_app(&mut app).context("Event loop failed")?;

  match app.failure
  {
    Some(err) => Err(err),
    None => Ok(()),
  }
}

struct LumenApp<D: Demo>
{
  window: Option<Arc<Window>>,
  gpu: Option<Gpu>,
  gui: Option<GuiRenderer>,
  demo: Option<D>,
  ctx: AppContext,
  failure: Option<anyhow::Error>,
}

impl<D: Demo> LumenApp<D>
{
  fn new(config: LumenConfig) -> Self
  {
    Self {
      window: None,
      gpu: None,
      gui: None,
      demo: None,
      ctx: AppContext::new(config, D::camera_start()),
      failure: None,
    }
  }

  fn init_window_and_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()>
  {
    if self.window.is_some()
    {
      return Ok(());
    }

    let window_config = &self.ctx.config.window;
    let attrs = Window::default_attributes()
      .with_title(format!("Lumen: {}", D::TITLE))
      .with_inner_size(LogicalSize::new(window_config.width, window_config.height));

    let window = Arc::new(event_loop.create_window(attrs).context("Failed to create window")?);

    let gpu = pollster::block_on(Gpu::new(window.clone(), window_config.vsync))?;
    let (width, height) = gpu.size();
    self.ctx.resize(width, height);

    let gui = GuiRenderer::new(&gpu.device, gpu.format(), &window);
    let demo = D::new(&gpu, &self.ctx).with_context(|| format!("Failed to set up {}", D::TITLE))?;

    log::info!("{} ready ({}x{})", D::TITLE, width, height);

    self.window = Some(window);
    self.gpu = Some(gpu);
    self.gui = Some(gui);
    self.demo = Some(demo);

    Ok(())
  }

  fn handle_window_event(&mut self, elwt: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    let window = match &self.window
    {
      Some(w) if w.id() == window_id => w.clone(),
      _ => return,
    };

    let gui_consumed = match &mut self.gui
    {
      Some(gui) if self.ctx.show_hud && !self.ctx.mouse_captured => gui.handle_event(&window, &event),
      _ => false,
    };

    if !gui_consumed
    {
      self.ctx.input.handle_event(&event);
    }

    match event
    {
      WindowEvent::CloseRequested =>
      {
        elwt.exit();
      }

      WindowEvent::Resized(size) =>
      {
        if size.width == 0 || size.height == 0
        {
          return;
        }

        if let (Some(gpu), Some(demo)) = (&mut self.gpu, &mut self.demo)
        {
          gpu.resize(size.width, size.height);
          demo.resize(gpu);
        }

        self.ctx.resize(size.width, size.height);
        window.request_redraw();
      }

      WindowEvent::Focused(false) =>
      {
        self.set_mouse_capture(&window, false);
      }

      WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } if !gui_consumed =>
      {
        let over_hud = self.gui.as_ref().is_some_and(|gui| self.ctx.show_hud && gui.wants_pointer());

        if !self.ctx.mouse_captured && !over_hud
        {
          self.set_mouse_capture(&window, true);
        }
      }

      _ =>
      {}
    }
  }

  /// Keys every demo shares; demo-specific keys are read in `Demo::update`.
  fn handle_global_keys(&mut self, elwt: &ActiveEventLoop)
  {
    let Some(window) = self.window.clone()
    else
    {
      return;
    };

    if self.ctx.input.was_pressed(KeyCode::Escape)
    {
      elwt.exit();
    }

    if self.ctx.input.was_pressed(KeyCode::Tab)
    {
      self.set_mouse_capture(&window, !self.ctx.mouse_captured);
    }

    if self.ctx.input.was_pressed(KeyCode::KeyH)
    {
      self.ctx.show_hud = !self.ctx.show_hud;
      log::info!("HUD {}", on_off(self.ctx.show_hud));
    }
  }

  fn set_mouse_capture(&mut self, window: &Window, capture: bool)
  {
    if capture == self.ctx.mouse_captured
    {
      return;
    }

    if capture
    {
      // Locked is not supported everywhere (e.g. Windows); Confined still works for look
      let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

      if let Err(err) = grabbed
      {
        log::warn!("Could not grab the cursor: {err}");
      }
    }
    else if let Err(err) = window.set_cursor_grab(CursorGrabMode::None)
    {
      log::warn!("Could not release the cursor: {err}");
    }

    window.set_cursor_visible(!capture);
    self.ctx.mouse_captured = capture;
  }

  fn frame(&mut self)
  {
    let (Some(window), Some(gpu), Some(gui), Some(demo)) = (&self.window, &mut self.gpu, &mut self.gui, &mut self.demo)
    else
    {
      return;
    };

    let ctx = &mut self.ctx;
    ctx.begin_frame();
    demo.update(gpu, ctx);

    // Keys for this frame are consumed whether or not it is drawn
    let Some(frame) = gpu.acquire_frame()
    else
    {
      ctx.end_frame();
      return;
    };

    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder =
      gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Frame Encoder") });

    demo.render(gpu, &mut encoder, &view);

    if ctx.show_hud
    {
      gui.draw(&gpu.device, &gpu.queue, &mut encoder, window, &view, |egui_ctx| draw_hud(egui_ctx, ctx, demo));
    }

    gpu.queue.submit(Some(encoder.finish()));
    window.pre_present_notify();
    frame.present();

    window.request_redraw();
    ctx.end_frame();
  }
}

impl<D: Demo> ApplicationHandler for LumenApp<D>
{
  fn resumed(&mut self, event_loop: &ActiveEventLoop)
  {
    event_loop.set_control_flow(ControlFlow::Wait);

    if let Err(err) = self.init_window_and_renderer(event_loop)
    {
      self.failure = Some(err);
      event_loop.exit();
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent)
  {
    self.handle_window_event(event_loop, window_id, event);
  }

  fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent)
  {
    if self.ctx.mouse_captured
    {
      self.ctx.input.handle_device_event(&event);
    }
  }

  fn about_to_wait(&mut self, event_loop: &ActiveEventLoop)
  {
    self.handle_global_keys(event_loop);
    self.frame();
  }
}

//
// ──────────────────────────────────────────────────────────────
//   HUD
// ──────────────────────────────────────────────────────────────
//

fn draw_hud<D: Demo>(egui_ctx: &egui::Context, ctx: &AppContext, demo: &D)
{
  let camera = &ctx.camera;

  egui::Window::new(D::TITLE).default_pos([10.0, 10.0]).resizable(false).show(egui_ctx, |ui| {
    ui.label(format!("{:.0} fps ({:.2} ms)", ctx.clock.fps(), ctx.clock.delta() * 1000.0));
    ui.label(format!("pos ({:.2}, {:.2}, {:.2})", camera.position.x, camera.position.y, camera.position.z));
    ui.label(format!("yaw {:.1}°  pitch {:.1}°  fov {:.1}°", camera.yaw(), camera.pitch(), camera.zoom()));

    ui.separator();
    demo.hud(ui);

    ui.separator();
    egui::Grid::new("controls").num_columns(2).show(ui, |ui| {
      let common = [
        ("WASD", "move"),
        ("Mouse", if ctx.mouse_captured { "look" } else { "click to look" }),
        ("Scroll", "zoom"),
        ("Tab", "capture mouse"),
        ("H", "hide HUD"),
        ("Esc", "quit"),
      ];

      for (key, action) in common.iter().chain(D::CONTROLS)
      {
        ui.label(*key);
        ui.label(*action);
        ui.end_row();
      }
    });
  });
}
