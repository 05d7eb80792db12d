use glam::Vec3;
use lumen_core::kernel::KernelEffect;
use lumen_core::lighting::LightRig;
use winit::keyboard::KeyCode;

use super::scene::{CrateScene, Dressing, LightMarkers, CRATE_POSITIONS};
use super::{begin_scene_pass, Demo};
use crate::camera::CameraBinding;
use crate::context::AppContext;
use crate::input::InputState;
use crate::renderer::flat::FlatRenderer;
use crate::renderer::lights::ShadingSettings;
use crate::renderer::lit::LitRenderer;
use crate::renderer::postprocess::KernelPass;
use crate::renderer::Gpu;

//
// ──────────────────────────────────────────────────────────────
//   Post-processing: the lit scene renders offscreen, then a
//   full-screen pass convolves it with a 3×3 kernel.
// ──────────────────────────────────────────────────────────────
//

/// Anything after `Glass` is hidden behind the pane's depth, so it goes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer
{
  Scene,
  Cutouts,
  Markers,
  Glass,
}

const DRAW_ORDER: [Layer; 4] = [Layer::Scene, Layer::Cutouts, Layer::Markers, Layer::Glass];

const DIGIT_KEYS: [KeyCode; 5] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4, KeyCode::Digit5];

pub struct PostProcess
{
  camera: CameraBinding,
  lit: LitRenderer,
  flat: FlatRenderer,
  scene: CrateScene,
  dressing: Dressing,
  markers: LightMarkers,
  rig: LightRig,
  kernel: KernelPass,
}

impl Demo for PostProcess
{
  const TITLE: &'static str = "Post-processing";
  const CONTROLS: &'static [(&'static str, &'static str)] = &[("K", "next kernel"), ("1-5", "pick kernel")];

  fn camera_start() -> Vec3
  {
    Vec3::new(0.0, 1.5, 3.0)
  }

  fn new(gpu: &Gpu, ctx: &AppContext) -> anyhow::Result<Self>
  {
    let device = &gpu.device;
    let (width, height) = gpu.size();

    let camera_layout = CameraBinding::layout(device);
    let camera = CameraBinding::new(device, &camera_layout, "Post-process Camera");

    let lit = LitRenderer::new(device, &camera_layout, gpu.format());
    let flat = FlatRenderer::new(device, &camera_layout, gpu.format());

    let scene = CrateScene::new(device, &gpu.queue, &lit, &ctx.config, &CRATE_POSITIONS);
    let dressing = Dressing::new(device, &gpu.queue, &lit, &ctx.config);

    let rig = LightRig::default();
    let markers = LightMarkers::new(device, &flat, &[rig.point.position]);

    let kernel = KernelPass::new(device, gpu.format(), width, height);

    Ok(Self { camera, lit, flat, scene, dressing, markers, rig, kernel })
  }

  fn update(&mut self, gpu: &Gpu, ctx: &AppContext)
  {
    if let Some(effect) = selected_effect(&ctx.input, self.kernel.effect)
    {
      self.kernel.set_effect(&gpu.queue, effect);
    }

    self.rig.animate(ctx.time());
    self.rig.spot_enabled = false;

    let settings = ShadingSettings { gamma_correction: true, surface_srgb: gpu.format().is_srgb() };
    self.lit.write_lights(&gpu.queue, &self.rig, settings);

    self.markers.update(&gpu.queue, &[self.rig.point.position], self.rig.color);
    self.camera.write(&gpu.queue, &ctx.camera_uniform());
  }

  fn resize(&mut self, gpu: &Gpu)
  {
    let (width, height) = gpu.size();
    self.kernel.resize(&gpu.device, width, height);
  }

  fn render(&mut self, _gpu: &Gpu, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView)
  {
    {
      let mut pass = begin_scene_pass(encoder, "Scene Pass", &self.kernel.scene.view, &self.kernel.scene.depth.view);

      for layer in DRAW_ORDER
      {
        match layer
        {
          Layer::Scene =>
          {
            self.lit.begin(&mut pass, &self.lit.pipeline, &self.camera.bind_group);
            self.scene.draw(&mut pass);
          }
          Layer::Cutouts => self.dressing.draw_cutouts(&mut pass),
          Layer::Markers => self.markers.draw(&mut pass, &self.flat, &self.camera.bind_group),
          Layer::Glass =>
          {
            // Markers switched pipelines
            self.lit.begin(&mut pass, &self.lit.pipeline, &self.camera.bind_group);
            self.dressing.draw_transparent(&mut pass);
          }
        }
      }
    }

    self.kernel.render(encoder, target);
  }

  fn hud(&self, ui: &mut egui::Ui)
  {
    ui.label(format!("kernel: {}", self.kernel.effect.name()));
  }
}

/// A digit picks an effect directly; K steps to the next one.
fn selected_effect(input: &InputState, current: KernelEffect) -> Option<KernelEffect>
{
  let picked = DIGIT_KEYS
    .iter()
    .zip(1u32..)
    .find(|(key, _)| input.was_pressed(**key))
    .and_then(|(_, digit)| KernelEffect::from_digit(digit));

  if picked.is_some()
  {
    return picked;
  }

  input.was_pressed(KeyCode::KeyK).then(|| current.next())
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn glass_is_drawn_after_every_opaque_layer()
  {
    assert_eq!(DRAW_ORDER.last(), Some(&Layer::Glass));
    assert_eq!(DRAW_ORDER.iter().filter(|l| **l == Layer::Glass).count(), 1);

    let markers = DRAW_ORDER.iter().position(|l| *l == Layer::Markers);
    let glass = DRAW_ORDER.iter().position(|l| *l == Layer::Glass);
    assert!(markers < glass);
  }

  #[test]
  fn k_cycles_from_current()
  {
    let mut input = InputState::new();
    input.press_key(KeyCode::KeyK);

    assert_eq!(selected_effect(&input, KernelEffect::Blur), Some(KernelEffect::EdgeDetect));
  }

  #[test]
  fn digits_win_over_k()
  {
    let mut input = InputState::new();
    input.press_key(KeyCode::KeyK);
    input.press_key(KeyCode::Digit5);

    assert_eq!(selected_effect(&input, KernelEffect::Identity), Some(KernelEffect::Emboss));
  }

  #[test]
  fn nothing_pressed_keeps_effect()
  {
    let mut input = InputState::new();
    assert_eq!(selected_effect(&input, KernelEffect::Sharpen), None);

    input.press_key(KeyCode::Digit2);
    input.end_frame();
    assert_eq!(selected_effect(&input, KernelEffect::Sharpen), None);
  }
}
