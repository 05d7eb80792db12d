use glam::{Mat4, Vec3, Vec4};
use lumen_core::lighting::LightRig;
use wgpu::{CompareFunction, StencilFaceState, StencilOperation, StencilState};
use winit::keyboard::KeyCode;

use super::scene::{CrateScene, CRATE_POSITIONS};
use super::{begin_scene_pass, on_off, Demo};
use crate::camera::CameraBinding;
use crate::context::AppContext;
use crate::renderer::depth::depth_state;
use crate::renderer::flat::{FlatColor, FlatRenderer};
use crate::renderer::lights::ShadingSettings;
use crate::renderer::lit::LitRenderer;
use crate::renderer::{Gpu, InstanceBuffer};

//
// ──────────────────────────────────────────────────────────────
//   Object outlining with the stencil buffer
//
//   1. ground, stencil untouched
//   2. crates, writing 1 into the stencil wherever they cover
//   3. slightly larger crates in a flat colour, only where the
//      stencil is still 0 and ignoring depth
// ──────────────────────────────────────────────────────────────
//

const OUTLINE_SCALE: f32 = 1.1;
const OUTLINE_COLOR: Vec4 = Vec4::new(1.0, 0.5, 0.0, 1.0);
const STENCIL_MARK: u32 = 1;

pub struct Outline
{
  camera: CameraBinding,
  lit: LitRenderer,
  scene: CrateScene,

  marking_pipeline: wgpu::RenderPipeline,
  outline: FlatRenderer,
  outline_color: FlatColor,
  outlines: InstanceBuffer,

  enabled: bool,
}

impl Demo for Outline
{
  const TITLE: &'static str = "Object outlining";
  const CONTROLS: &'static [(&'static str, &'static str)] = &[("O", "outline")];

  fn camera_start() -> Vec3
  {
    Vec3::new(0.0, 1.5, 3.0)
  }

  fn new(gpu: &Gpu, ctx: &AppContext) -> anyhow::Result<Self>
  {
    let device = &gpu.device;
    let format = gpu.format();

    let camera_layout = CameraBinding::layout(device);
    let camera = CameraBinding::new(device, &camera_layout, "Outline Camera");

    let lit = LitRenderer::new(device, &camera_layout, format);
    let mut rig = LightRig::default();
    rig.spot_enabled = false;
    lit.write_lights(&gpu.queue, &rig, ShadingSettings { gamma_correction: true, surface_srgb: format.is_srgb() });

    let scene = CrateScene::new(device, &gpu.queue, &lit, &ctx.config, &CRATE_POSITIONS);

    let marking_pipeline = lit.variant(
      device,
      &camera_layout,
      "Stencil Marking Pipeline",
      format,
      depth_state(true, CompareFunction::Less, marking_stencil()),
    );

    let outline = FlatRenderer::with_depth_stencil(device, &camera_layout, "Outline Pipeline", format, outline_depth());
    let outline_color = outline.color(device, "Outline Color", OUTLINE_COLOR);
    let outlines = InstanceBuffer::from_matrices(device, "Outline Instances", &outline_models(&CRATE_POSITIONS));

    Ok(Self {
      camera,
      lit,
      scene,
      marking_pipeline,
      outline,
      outline_color,
      outlines,
      enabled: true,
    })
  }

  fn update(&mut self, gpu: &Gpu, ctx: &AppContext)
  {
    if ctx.input.was_pressed(KeyCode::KeyO)
    {
      self.enabled = !self.enabled;
      log::info!("Outline {}", on_off(self.enabled));
    }

    self.camera.write(&gpu.queue, &ctx.camera_uniform());
  }

  fn render(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView)
  {
    let mut pass = begin_scene_pass(encoder, "Outline Pass", target, &gpu.depth.view);
    pass.set_stencil_reference(STENCIL_MARK);

    self.lit.begin(&mut pass, &self.lit.pipeline, &self.camera.bind_group);
    self.scene.draw_ground(&mut pass);

    self.lit.begin(&mut pass, &self.marking_pipeline, &self.camera.bind_group);
    self.scene.draw_crates(&mut pass);

    if !self.enabled
    {
      return;
    }

    pass.set_pipeline(&self.outline.pipeline);
    pass.set_bind_group(0, &self.camera.bind_group, &[]);
    pass.set_bind_group(1, &self.outline_color.bind_group, &[]);
    self.scene.cube_mesh().draw(&mut pass, &self.outlines);
  }

  fn hud(&self, ui: &mut egui::Ui)
  {
    ui.label(format!("outline: {}", on_off(self.enabled)));
  }
}

/// Every covered fragment gets the reference value.
fn marking_stencil() -> StencilState
{
  let face = StencilFaceState {
    compare: CompareFunction::Always,
    fail_op: StencilOperation::Keep,
    depth_fail_op: StencilOperation::Keep,
    pass_op: StencilOperation::Replace,
  };

  StencilState { front: face, back: face, read_mask: 0xFF, write_mask: 0xFF }
}

/// Passes only outside the marked area; never writes.
fn outline_stencil() -> StencilState
{
  let face = StencilFaceState {
    compare: CompareFunction::NotEqual,
    fail_op: StencilOperation::Keep,
    depth_fail_op: StencilOperation::Keep,
    pass_op: StencilOperation::Keep,
  };

  StencilState { front: face, back: face, read_mask: 0xFF, write_mask: 0x00 }
}

/// Drawn over everything (no depth test or write), masked by the stencil.
fn outline_depth() -> wgpu::DepthStencilState
{
  depth_state(false, CompareFunction::Always, outline_stencil())
}

fn outline_models(positions: &[Vec3]) -> Vec<Mat4>
{
  positions
    .iter()
    .map(|p| Mat4::from_translation(*p) * Mat4::from_scale(Vec3::splat(OUTLINE_SCALE)))
    .collect()
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn outlines_grow_around_crate_centres()
  {
    let models = outline_models(&CRATE_POSITIONS);
    assert_eq!(models.len(), CRATE_POSITIONS.len());

    for (model, centre) in models.iter().zip(CRATE_POSITIONS)
    {
      assert!(model.transform_point3(Vec3::ZERO).abs_diff_eq(centre, 1e-6));

      let corner = model.transform_point3(Vec3::splat(0.5)) - centre;
      assert!(corner.abs_diff_eq(Vec3::splat(0.5 * OUTLINE_SCALE), 1e-6));
    }
  }

  #[test]
  fn outline_never_touches_the_stencil()
  {
    let marking = marking_stencil();
    let outline = outline_stencil();

    assert_eq!(marking.front.pass_op, StencilOperation::Replace);
    assert!(marking.is_enabled());
    assert_eq!(outline.write_mask, 0);
    assert_eq!(outline.front.compare, CompareFunction::NotEqual);
  }

  #[test]
  fn outline_ignores_depth()
  {
    let state = outline_depth();

    assert!(!state.depth_write_enabled);
    assert_eq!(state.depth_compare, CompareFunction::Always);
    assert_eq!(state.stencil, outline_stencil());
  }
}
