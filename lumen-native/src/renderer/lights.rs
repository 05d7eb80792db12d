use glam::Vec3;
use lumen_core::lighting::{Attenuation, LightRig, PhongTerms};

//
// ──────────────────────────────────────────────────────────────
//   Lights Uniform (GPU side)
//
//   WGSL layout (lit.wgsl), every field a vec4<f32>:
//     point       : 5 × 16 =  80 bytes
//     directional : 4 × 16 =  64 bytes
//     spot        : 7 × 16 = 112 bytes
//     settings    :          16 bytes
//   Total: 272 bytes
//
//   settings.x  spotlight on
//   settings.y  gamma correction on
//   settings.z  target encodes sRGB in hardware
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw
{
  pub position: [f32; 4],
  pub ambient: [f32; 4],
  pub diffuse: [f32; 4],
  pub specular: [f32; 4],
  pub attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw
{
  pub direction: [f32; 4],
  pub ambient: [f32; 4],
  pub diffuse: [f32; 4],
  pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightRaw
{
  pub position: [f32; 4],
  pub direction: [f32; 4],
  pub ambient: [f32; 4],
  pub diffuse: [f32; 4],
  pub specular: [f32; 4],
  pub attenuation: [f32; 4],
  pub cone: [f32; 4], // x = cos(inner), y = cos(outer)
}

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform
{
  pub point: PointLightRaw,
  pub directional: DirectionalLightRaw,
  pub spot: SpotLightRaw,
  pub settings: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<LightsUniform>() == 272);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadingSettings
{
  pub gamma_correction: bool,
  pub surface_srgb: bool,
}

impl LightsUniform
{
  pub fn new(rig: &LightRig, settings: ShadingSettings) -> Self
  {
    let point = &rig.point;
    let sun = &rig.directional;
    let spot = &rig.spot;

    let [point_ambient, point_diffuse, point_specular] = terms(&point.terms);
    let [sun_ambient, sun_diffuse, sun_specular] = terms(&sun.terms);
    let [spot_ambient, spot_diffuse, spot_specular] = terms(&spot.terms);

    Self {
      point: PointLightRaw {
        position: point4(point.position),
        ambient: point_ambient,
        diffuse: point_diffuse,
        specular: point_specular,
        attenuation: attenuation(&point.attenuation),
      },
      directional: DirectionalLightRaw {
        direction: dir4(sun.direction),
        ambient: sun_ambient,
        diffuse: sun_diffuse,
        specular: sun_specular,
      },
      spot: SpotLightRaw {
        position: point4(spot.position),
        direction: dir4(spot.direction),
        ambient: spot_ambient,
        diffuse: spot_diffuse,
        specular: spot_specular,
        attenuation: attenuation(&spot.attenuation),
        cone: [spot.inner_cos(), spot.outer_cos(), 0.0, 0.0],
      },
      settings: [flag(rig.spot_enabled), flag(settings.gamma_correction), flag(settings.surface_srgb), 0.0],
    }
  }
}

fn point4(v: Vec3) -> [f32; 4]
{
  v.extend(1.0).to_array()
}

fn dir4(v: Vec3) -> [f32; 4]
{
  v.extend(0.0).to_array()
}

fn terms(t: &PhongTerms) -> [[f32; 4]; 3]
{
  [dir4(t.ambient), dir4(t.diffuse), dir4(t.specular)]
}

fn attenuation(a: &Attenuation) -> [f32; 4]
{
  [a.constant, a.linear, a.quadratic, 0.0]
}

fn flag(on: bool) -> f32
{
  if on { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests
{
  use super::*;

  const SETTINGS: ShadingSettings = ShadingSettings { gamma_correction: true, surface_srgb: true };

  #[test]
  fn rig_maps_onto_uniform()
  {
    let rig = LightRig::default();
    let uniform = LightsUniform::new(&rig, SETTINGS);

    assert_eq!(uniform.point.position, [1.2, 0.5, 1.0, 1.0]);
    assert_eq!(uniform.point.diffuse, [0.5, 0.5, 0.5, 0.0]);
    assert_eq!(uniform.point.attenuation, [1.0, 0.022, 0.001, 0.0]);
    assert_eq!(uniform.directional.direction[3], 0.0);
    assert_eq!(uniform.spot.cone[0], rig.spot.inner_cos());
    assert_eq!(uniform.spot.cone[1], rig.spot.outer_cos());
  }

  #[test]
  fn settings_flags_are_packed()
  {
    let mut rig = LightRig::default();
    rig.spot_enabled = false;

    let uniform = LightsUniform::new(&rig, ShadingSettings { gamma_correction: true, surface_srgb: false });
    assert_eq!(uniform.settings, [0.0, 1.0, 0.0, 0.0]);
  }
}
