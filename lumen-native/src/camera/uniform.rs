use glam::{Mat4, Vec3};
use lumen_core::Camera;

//
// ──────────────────────────────────────────────────────────────
//   Camera Uniform (GPU side)
//
//   WGSL layout (every shader declares the same struct):
//     view       : mat4x4<f32>   → 64 bytes
//     projection : mat4x4<f32>   → 64 bytes
//     view_pos   : vec4<f32>     → 16 bytes (w unused)
//   Total: 144 bytes
// ──────────────────────────────────────────────────────────────
//

pub const ZNEAR: f32 = 0.1;
pub const ZFAR: f32 = 100.0;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform
{
  pub view: [[f32; 4]; 4],       // 64 bytes
  pub projection: [[f32; 4]; 4], // 64 bytes
  pub view_pos: [f32; 4],        // 16 bytes
}

// Catch CPU/GPU layout mismatches at compile time
const _: () = assert!(std::mem::size_of::<CameraUniform>() == 144);

impl CameraUniform
{
  pub fn from_camera(camera: &Camera, aspect: f32) -> Self
  {
    Self::from_matrices(camera.view_matrix(), camera.projection_matrix(aspect, ZNEAR, ZFAR), camera.position)
  }

  pub fn from_matrices(view: Mat4, projection: Mat4, eye: Vec3) -> Self
  {
    Self {
      view: view.to_cols_array_2d(),
      projection: projection.to_cols_array_2d(),
      view_pos: eye.extend(1.0).to_array(),
    }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Buffer + bind group (group 0 in every pipeline)
// ──────────────────────────────────────────────────────────────
//

pub struct CameraBinding
{
  pub buffer: wgpu::Buffer,
  pub bind_group: wgpu::BindGroup,
}

impl CameraBinding
{
  pub fn layout(device: &wgpu::Device) -> wgpu::BindGroupLayout
  {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
      label: Some("Camera BGL"),
      entries: &[wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
          ty: wgpu::BufferBindingType::Uniform,
          has_dynamic_offset: false,
          min_binding_size: None,
        },
        count: None,
      }],
    })
  }

  pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self
  {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
      label: Some(label),
      size: std::mem::size_of::<CameraUniform>() as u64,
      usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      label: Some(label),
      layout,
      entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
    });

    Self { buffer, bind_group }
  }

  pub fn write(&self, queue: &wgpu::Queue, uniform: &CameraUniform)
  {
    queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn uniform_carries_camera_position()
  {
    let camera = Camera::at(Vec3::new(1.0, 2.0, 3.0));
    let uniform = CameraUniform::from_camera(&camera, 4.0 / 3.0);

    assert_eq!(uniform.view_pos, [1.0, 2.0, 3.0, 1.0]);
    assert_eq!(uniform.view, camera.view_matrix().to_cols_array_2d());
  }

  #[test]
  fn uniform_is_tightly_packed()
  {
    let uniform = CameraUniform::from_matrices(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO);
    assert_eq!(bytemuck::bytes_of(&uniform).len(), 144);
  }
}
