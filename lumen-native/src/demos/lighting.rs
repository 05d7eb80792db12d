use glam::Vec3;
use lumen_core::lighting::{funky_color, LightRig};
use winit::keyboard::KeyCode;

use super::scene::{CrateScene, LightMarkers, CRATE_POSITIONS};
use super::{begin_scene_pass, on_off, Demo};
use crate::camera::CameraBinding;
use crate::context::AppContext;
use crate::input::InputState;
use crate::renderer::flat::FlatRenderer;
use crate::renderer::lights::ShadingSettings;
use crate::renderer::lit::{LitRenderer, MaterialParams};
use crate::renderer::Gpu;

//
// ──────────────────────────────────────────────────────────────
//   Lighting: Phong shading with a directional light, an
//   orbiting point light and a sweeping spotlight.
// ──────────────────────────────────────────────────────────────
//

const EMISSION_STRENGTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Toggles
{
  funky: bool,
  emission: bool,
  gamma: bool,
  spot: bool,
}

impl Default for Toggles
{
  fn default() -> Self
  {
    Self { funky: false, emission: false, gamma: true, spot: true }
  }
}

impl Toggles
{
  /// Flip every toggle whose key went down this frame.
  fn apply(&mut self, input: &InputState)
  {
    let bindings = [
      (KeyCode::KeyF, &mut self.funky),
      (KeyCode::KeyI, &mut self.emission),
      (KeyCode::KeyG, &mut self.gamma),
      (KeyCode::KeyL, &mut self.spot),
    ];

    for (key, flag) in bindings
    {
      if input.was_pressed(key)
      {
        *flag = !*flag;
      }
    }
  }
}

pub struct Lighting
{
  camera: CameraBinding,
  lit: LitRenderer,
  flat: FlatRenderer,
  scene: CrateScene,
  markers: LightMarkers,

  rig: LightRig,
  toggles: Toggles,
}

impl Demo for Lighting
{
  const TITLE: &'static str = "Lighting";
  const CONTROLS: &'static [(&'static str, &'static str)] =
    &[("F", "funky light colour"), ("I", "emission map"), ("G", "gamma correction"), ("L", "spotlight")];

  fn camera_start() -> Vec3
  {
    Vec3::new(0.0, 1.5, 3.0)
  }

  fn new(gpu: &Gpu, ctx: &AppContext) -> anyhow::Result<Self>
  {
    let device = &gpu.device;

    let camera_layout = CameraBinding::layout(device);
    let camera = CameraBinding::new(device, &camera_layout, "Lighting Camera");

    let lit = LitRenderer::new(device, &camera_layout, gpu.format());
    let flat = FlatRenderer::new(device, &camera_layout, gpu.format());

    let scene = CrateScene::new(device, &gpu.queue, &lit, &ctx.config, &CRATE_POSITIONS);

    let rig = LightRig::default();
    let markers = LightMarkers::new(device, &flat, &[rig.point.position, rig.spot.position]);

    Ok(Self { camera, lit, flat, scene, markers, rig, toggles: Toggles::default() })
  }

  fn update(&mut self, gpu: &Gpu, ctx: &AppContext)
  {
    let before = self.toggles;
    self.toggles.apply(&ctx.input);

    if self.toggles.emission != before.emission
    {
      let strength = if self.toggles.emission { EMISSION_STRENGTH } else { 0.0 };
      let params = MaterialParams { emission_strength: strength, ..self.scene.crate_material.params };
      self.scene.crate_material.set_params(&gpu.queue, params);
    }

    if self.toggles != before
    {
      log::info!(
        "funky {}, emission {}, gamma {}, spotlight {}",
        on_off(self.toggles.funky),
        on_off(self.toggles.emission),
        on_off(self.toggles.gamma),
        on_off(self.toggles.spot)
      );
    }

    let t = ctx.time();
    self.rig.animate(t);
    self.rig.spot_enabled = self.toggles.spot;
    self.rig.set_color(if self.toggles.funky { funky_color(t) } else { Vec3::ONE });

    let settings = ShadingSettings { gamma_correction: self.toggles.gamma, surface_srgb: gpu.format().is_srgb() };
    self.lit.write_lights(&gpu.queue, &self.rig, settings);

    self.markers.update(&gpu.queue, &[self.rig.point.position, self.rig.spot.position], self.rig.color);
    self.camera.write(&gpu.queue, &ctx.camera_uniform());
  }

  fn render(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView)
  {
    let mut pass = begin_scene_pass(encoder, "Lighting Pass", target, &gpu.depth.view);

    self.lit.begin(&mut pass, &self.lit.pipeline, &self.camera.bind_group);
    self.scene.draw(&mut pass);

    self.markers.draw(&mut pass, &self.flat, &self.camera.bind_group);
  }

  fn hud(&self, ui: &mut egui::Ui)
  {
    ui.label(format!("funky colour: {}", on_off(self.toggles.funky)));
    ui.label(format!("emission: {}", on_off(self.toggles.emission)));
    ui.label(format!("gamma correction: {}", on_off(self.toggles.gamma)));
    ui.label(format!("spotlight: {}", on_off(self.toggles.spot)));
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn each_key_flips_one_toggle()
  {
    let mut toggles = Toggles::default();
    let mut input = InputState::new();

    input.press_key(KeyCode::KeyG);
    toggles.apply(&input);
    assert_eq!(toggles, Toggles { gamma: false, ..Toggles::default() });

    input.end_frame();
    input.press_key(KeyCode::KeyF);
    input.press_key(KeyCode::KeyL);
    toggles.apply(&input);
    assert_eq!(toggles, Toggles { funky: true, gamma: false, spot: false, emission: false });
  }

  #[test]
  fn holding_a_key_toggles_once()
  {
    let mut toggles = Toggles::default();
    let mut input = InputState::new();

    input.press_key(KeyCode::KeyI);
    for _ in 0..10
    {
      toggles.apply(&input);
      input.end_frame();
    }

    assert!(toggles.emission);
  }
}
