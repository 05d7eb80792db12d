use glam::{Mat4, Vec3};
use lumen_core::cube_faces::{capture_projection, CubeFace};
use lumen_core::lighting::LightRig;

use super::scene::{CrateScene, Dressing, CRATE_POSITIONS};
use super::{begin_scene_pass, Demo};
use crate::camera::{CameraBinding, CameraUniform, ZFAR, ZNEAR};
use crate::context::AppContext;
use crate::renderer::depth::opaque_depth;
use crate::renderer::lights::ShadingSettings;
use crate::renderer::lit::LitRenderer;
use crate::renderer::mesh::cube;
use crate::renderer::pipeline::{create_mesh_pipeline, create_shader, MeshPipelineDesc};
use crate::renderer::skybox::{environment_bind_group, environment_layout, Skybox};
use crate::renderer::target::CubeCapture;
use crate::renderer::{CubeTexture, Gpu, InstanceBuffer, Mesh};

//
// ──────────────────────────────────────────────────────────────
//   Dynamic reflection
//
//   Every frame the scene is rendered six times from the mirror
//   cube's centre into a cube map, which the cube then samples
//   along the reflected view ray. The mirror itself is left out
//   of the capture.
// ──────────────────────────────────────────────────────────────
//

const MIRROR_CENTRE: Vec3 = Vec3::new(0.0, 1.0, 0.0);

pub struct Reflection
{
  camera: CameraBinding,
  lit: LitRenderer,
  skybox: Skybox,
  scene: CrateScene,
  dressing: Dressing,

  capture: CubeCapture,
  face_cameras: Vec<(CubeFace, CameraBinding)>,

  mirror_pipeline: wgpu::RenderPipeline,
  mirror_bind_group: wgpu::BindGroup,
  mirror_mesh: Mesh,
  mirror: InstanceBuffer,

  _sky: CubeTexture,
}

impl Demo for Reflection
{
  const TITLE: &'static str = "Dynamic reflection";

  fn camera_start() -> Vec3
  {
    Vec3::new(0.0, 1.5, 4.0)
  }

  fn new(gpu: &Gpu, ctx: &AppContext) -> anyhow::Result<Self>
  {
    let device = &gpu.device;
    let queue = &gpu.queue;
    let config = &ctx.config;
    let format = gpu.format();

    let camera_layout = CameraBinding::layout(device);
    let camera = CameraBinding::new(device, &camera_layout, "Reflection Camera");

    let lit = LitRenderer::new(device, &camera_layout, format);
    let mut rig = LightRig::default();
    rig.spot_enabled = false;
    lit.write_lights(queue, &rig, ShadingSettings { gamma_correction: true, surface_srgb: format.is_srgb() });

    let sky = CubeTexture::load_or_sky(device, queue, &config.asset_path("textures/skybox"));
    let skybox = Skybox::new(device, &camera_layout, format, &sky);

    // The mirror sits where the centre crate would be
    let scene = CrateScene::new(device, queue, &lit, config, &CRATE_POSITIONS[1..]);
    let dressing = Dressing::new(device, queue, &lit, config);

    let size = capture_size(config.reflection.capture_size, device.limits().max_texture_dimension_2d);
    log::info!("Reflection capture: 6 × {size}²");
    let capture = CubeCapture::new(device, format, size);

    let face_cameras = CubeFace::ALL
      .iter()
      .map(|&face| {
        let binding = CameraBinding::new(device, &camera_layout, &format!("Capture Camera {}", face.label()));
        binding.write(queue, &face_uniform(face, MIRROR_CENTRE));
        (face, binding)
      })
      .collect();

    let shader = create_shader(device, "Reflect Shader", include_str!("../../shaders/reflect.wgsl"));
    let env_layout = environment_layout(device, "Environment BGL");
    let mirror_bind_group = environment_bind_group(device, &env_layout, "Environment BG", &capture.cube);

    let mirror_pipeline = create_mesh_pipeline(
      device,
      &MeshPipelineDesc {
        label: "Reflect Pipeline",
        shader: &shader,
        bind_group_layouts: &[&camera_layout, &env_layout],
        color_format: format,
        blend: Some(wgpu::BlendState::REPLACE),
        depth_stencil: opaque_depth(),
      },
    );

    Ok(Self {
      camera,
      lit,
      skybox,
      scene,
      dressing,
      capture,
      face_cameras,
      mirror_pipeline,
      mirror_bind_group,
      mirror_mesh: Mesh::upload(device, "Mirror", &cube()),
      mirror: InstanceBuffer::single(device, "Mirror Instance", Mat4::from_translation(MIRROR_CENTRE)),
      _sky: sky,
    })
  }

  fn update(&mut self, gpu: &Gpu, ctx: &AppContext)
  {
    self.camera.write(&gpu.queue, &ctx.camera_uniform());
  }

  fn render(&mut self, gpu: &Gpu, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView)
  {
    for (face, face_camera) in &self.face_cameras
    {
      let mut pass = begin_scene_pass(
        encoder,
        &format!("Capture {}", face.label()),
        self.capture.face_view(*face),
        &self.capture.depth.view,
      );
      self.draw_surroundings(&mut pass, &face_camera.bind_group);
    }

    let mut pass = begin_scene_pass(encoder, "Reflection Pass", target, &gpu.depth.view);
    self.draw_surroundings(&mut pass, &self.camera.bind_group);

    pass.set_pipeline(&self.mirror_pipeline);
    pass.set_bind_group(0, &self.camera.bind_group, &[]);
    pass.set_bind_group(1, &self.mirror_bind_group, &[]);
    self.mirror_mesh.draw(&mut pass, &self.mirror);
  }

  fn hud(&self, ui: &mut egui::Ui)
  {
    ui.label(format!("capture: 6 × {}²", self.capture.size));
  }
}

impl Reflection
{
  /// Sky, then the lit scene with transparent geometry last.
  fn draw_surroundings(&self, pass: &mut wgpu::RenderPass<'_>, camera: &wgpu::BindGroup)
  {
    self.skybox.draw(pass, camera);

    self.lit.begin(pass, &self.lit.pipeline, camera);
    self.scene.draw(pass);
    self.dressing.draw_cutouts(pass);
    self.dressing.draw_transparent(pass);
  }
}

fn face_uniform(face: CubeFace, centre: Vec3) -> CameraUniform
{
  CameraUniform::from_matrices(face.view_matrix(centre), capture_projection(ZNEAR, ZFAR), centre)
}

fn capture_size(requested: u32, device_max: u32) -> u32
{
  if requested > device_max
  {
    log::warn!("Reflection capture size {requested} exceeds the device limit, using {device_max}");
  }

  requested.clamp(1, device_max.max(1))
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn capture_size_respects_device_limit()
  {
    assert_eq!(capture_size(1024, 8192), 1024);
    assert_eq!(capture_size(16384, 8192), 8192);
    assert_eq!(capture_size(0, 8192), 1);
  }

  #[test]
  fn face_cameras_sit_at_the_mirror()
  {
    for face in CubeFace::ALL
    {
      let uniform = face_uniform(face, MIRROR_CENTRE);
      let view = Mat4::from_cols_array_2d(&uniform.view);

      assert!(view.transform_point3(MIRROR_CENTRE).abs_diff_eq(Vec3::ZERO, 1e-5));
      assert_eq!(uniform.view_pos[..3], MIRROR_CENTRE.to_array());
    }
  }
}
