use glam::{Mat4, Vec2, Vec3, Vec4};
use wgpu::util::DeviceExt;

//
// ──────────────────────────────────────────────────────────────
//   Vertex formats
//
//   Slot 0 (per vertex):   position @0, normal @1, uv @2
//   Slot 1 (per instance): model matrix columns @3..@6
//
//   Every mesh draw is instanced, a single object is just an
//   instance buffer of length one.
// ──────────────────────────────────────────────────────────────
//

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex
{
  pub position: [f32; 3],
  pub normal: [f32; 3],
  pub uv: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<MeshVertex>() == 32);

impl MeshVertex
{
  const ATTRIBS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

  const POSITION_ONLY: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

  pub fn layout() -> wgpu::VertexBufferLayout<'static>
  {
    wgpu::VertexBufferLayout {
      array_stride: std::mem::size_of::<MeshVertex>() as u64,
      step_mode: wgpu::VertexStepMode::Vertex,
      attributes: &Self::ATTRIBS,
    }
  }

  /// Same buffer, positions only (skybox).
  pub fn position_layout() -> wgpu::VertexBufferLayout<'static>
  {
    wgpu::VertexBufferLayout {
      array_stride: std::mem::size_of::<MeshVertex>() as u64,
      step_mode: wgpu::VertexStepMode::Vertex,
      attributes: &Self::POSITION_ONLY,
    }
  }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw
{
  pub model: [[f32; 4]; 4],
}

const _: () = assert!(std::mem::size_of::<InstanceRaw>() == 64);

impl InstanceRaw
{
  const ATTRIBS: [wgpu::VertexAttribute; 4] =
    wgpu::vertex_attr_array![3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4];

  pub fn layout() -> wgpu::VertexBufferLayout<'static>
  {
    wgpu::VertexBufferLayout {
      array_stride: std::mem::size_of::<InstanceRaw>() as u64,
      step_mode: wgpu::VertexStepMode::Instance,
      attributes: &Self::ATTRIBS,
    }
  }

  pub fn from_matrix(model: Mat4) -> Self
  {
    Self { model: model.to_cols_array_2d() }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   CPU-side geometry
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default)]
pub struct MeshData
{
  pub vertices: Vec<MeshVertex>,
  pub indices: Vec<u32>,
}

impl MeshData
{
  fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3, uv_scale: f32)
  {
    let base = self.vertices.len() as u32;
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    for (corner, uv) in corners.iter().zip(uvs)
    {
      self.vertices.push(MeshVertex {
        position: corner.to_array(),
        normal: normal.to_array(),
        uv: [uv[0] * uv_scale, uv[1] * uv_scale],
      });
    }

    self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
  }
}

/// Unit cube centred on the origin, 4 vertices per face, outward CCW winding.
pub fn cube() -> MeshData
{
  let mut mesh = MeshData::default();

  // (normal, u axis, v axis) with u × v = normal
  let faces = [
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
  ];

  for (normal, u, v) in faces
  {
    let centre = normal * 0.5;
    let (u, v) = (u * 0.5, v * 0.5);
    mesh.push_quad([centre - u - v, centre + u - v, centre + u + v, centre - u + v], normal, 1.0);
  }

  mesh
}

/// Unit square in the XZ plane facing +Y; uvs span `0..uv_scale` for tiling.
pub fn plane(uv_scale: f32) -> MeshData
{
  let mut mesh = MeshData::default();
  let corners = [
    Vec3::new(-0.5, 0.0, 0.5),
    Vec3::new(0.5, 0.0, 0.5),
    Vec3::new(0.5, 0.0, -0.5),
    Vec3::new(-0.5, 0.0, -0.5),
  ];

  mesh.push_quad(corners, Vec3::Y, uv_scale);
  mesh
}

/// Unit-radius UV sphere. `segments` around the equator, `rings` pole to pole.
pub fn sphere(segments: u32, rings: u32) -> MeshData
{
  let segments = segments.max(3);
  let rings = rings.max(2);
  let mut mesh = MeshData::default();

  for ring in 0..=rings
  {
    let v = ring as f32 / rings as f32;

    // Poles are pinned exactly so their fan triangles collapse cleanly
    let (sin_theta, cos_theta) = match ring
    {
      0 => (0.0, 1.0),
      r if r == rings => (0.0, -1.0),
      _ => (v * std::f32::consts::PI).sin_cos(),
    };

    for segment in 0..=segments
    {
      let u = segment as f32 / segments as f32;
      let phi = u * std::f32::consts::TAU;

      let normal = Vec3::new(sin_theta * phi.cos(), cos_theta, -sin_theta * phi.sin());
      mesh.vertices.push(MeshVertex { position: normal.to_array(), normal: normal.to_array(), uv: [u, v] });
    }
  }

  let stride = segments + 1;
  for ring in 0..rings
  {
    for segment in 0..segments
    {
      let a = ring * stride + segment;
      let b = a + stride;
      mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
    }
  }

  mesh
}

/// Tangent frame of a flat mesh, taken from its first triangle.
///
/// `xyz` is the direction of increasing u. `w` is the sign that turns
/// `cross(normal, tangent)` into the bitangent pointing at the top image
/// row (v decreasing), where tangent-space normal maps store +green.
pub fn surface_tangent(mesh: &MeshData) -> Option<Vec4>
{
  let tri = mesh.indices.get(0..3)?;
  let corner = |i: u32| mesh.vertices.get(i as usize);
  let (a, b, c) = (corner(tri[0])?, corner(tri[1])?, corner(tri[2])?);

  let (p0, p1, p2) = (Vec3::from(a.position), Vec3::from(b.position), Vec3::from(c.position));
  let (uv0, uv1, uv2) = (Vec2::from(a.uv), Vec2::from(b.uv), Vec2::from(c.uv));

  let (e1, e2) = (p1 - p0, p2 - p0);
  let (d1, d2) = (uv1 - uv0, uv2 - uv0);

  let det = d1.x * d2.y - d2.x * d1.y;
  if det.abs() < 1e-12
  {
    return None;
  }

  let tangent = ((e1 * d2.y - e2 * d1.y) / det).try_normalize()?;
  let along_v = (e2 * d1.x - e1 * d2.x) / det;

  let normal = Vec3::from(a.normal);
  let handedness = if normal.cross(tangent).dot(-along_v) >= 0.0 { 1.0 } else { -1.0 };

  Some(tangent.extend(handedness))
}

//
// ──────────────────────────────────────────────────────────────
//   GPU buffers
// ──────────────────────────────────────────────────────────────
//

pub struct Mesh
{
  pub vertex_buffer: wgpu::Buffer,
  pub index_buffer: wgpu::Buffer,
  pub index_count: u32,
}

impl Mesh
{
  pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self
  {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some(&format!("{label} Vertex Buffer")),
      contents: bytemuck::cast_slice(&data.vertices),
      usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some(&format!("{label} Index Buffer")),
      contents: bytemuck::cast_slice(&data.indices),
      usage: wgpu::BufferUsages::INDEX,
    });

    Self { vertex_buffer, index_buffer, index_count: data.indices.len() as u32 }
  }

  pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, instances: &InstanceBuffer)
  {
    if instances.count == 0
    {
      return;
    }

    pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
    pass.set_vertex_buffer(1, instances.buffer.slice(..));
    pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    pass.draw_indexed(0..self.index_count, 0, 0..instances.count);
  }

  /// Draw without the instance slot (pipelines using `position_layout`).
  pub fn draw_single(&self, pass: &mut wgpu::RenderPass<'_>)
  {
    pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
    pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    pass.draw_indexed(0..self.index_count, 0, 0..1);
  }
}

/// Fixed-capacity buffer of model matrices.
pub struct InstanceBuffer
{
  pub buffer: wgpu::Buffer,
  pub capacity: u32,
  pub count: u32,
}

impl InstanceBuffer
{
  pub fn from_matrices(device: &wgpu::Device, label: &str, models: &[Mat4]) -> Self
  {
    let count = models.len() as u32;
    let mut contents: Vec<InstanceRaw> = models.iter().copied().map(InstanceRaw::from_matrix).collect();

    // A zero-sized vertex buffer is invalid; keep one zeroed slot
    if contents.is_empty()
    {
      contents.push(InstanceRaw::from_matrix(Mat4::ZERO));
    }

    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some(label),
      contents: bytemuck::cast_slice(&contents),
      usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });

    Self { buffer, capacity: contents.len() as u32, count }
  }

  pub fn single(device: &wgpu::Device, label: &str, model: Mat4) -> Self
  {
    Self::from_matrices(device, label, &[model])
  }

  /// Overwrite the instances; anything past capacity is dropped.
  pub fn write(&mut self, queue: &wgpu::Queue, models: &[Mat4])
  {
    if models.len() > self.capacity as usize
    {
      log::warn!("Instance buffer holds {} models, dropping {}", self.capacity, models.len() - self.capacity as usize);
    }

    let raw: Vec<InstanceRaw> =
      models.iter().take(self.capacity as usize).copied().map(InstanceRaw::from_matrix).collect();

    queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&raw));
    self.count = raw.len() as u32;
  }
}

#[cfg(test)]
mod tests
{
  use super::*;

  fn vertex(mesh: &MeshData, index: u32) -> Vec3
  {
    Vec3::from_array(mesh.vertices[index as usize].position)
  }

  fn assert_outward_winding(mesh: &MeshData)
  {
    for tri in mesh.indices.chunks(3)
    {
      let (a, b, c) = (vertex(mesh, tri[0]), vertex(mesh, tri[1]), vertex(mesh, tri[2]));
      let face_normal = (b - a).cross(c - a);
      let n = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);

      if face_normal.length_squared() > 1e-12
      {
        assert!(face_normal.dot(n) > 0.0, "triangle {tri:?} winds inward");
      }
    }
  }

  #[test]
  fn cube_has_flat_shaded_faces()
  {
    let mesh = cube();

    assert_eq!(mesh.vertices.len(), 24);
    assert_eq!(mesh.indices.len(), 36);

    for v in &mesh.vertices
    {
      let p = Vec3::from_array(v.position);
      let n = Vec3::from_array(v.normal);
      assert!(n.is_normalized());
      assert!((p.dot(n) - 0.5).abs() < 1e-6, "vertex {p} is not on its face");
    }

    assert_outward_winding(&mesh);
  }

  #[test]
  fn plane_faces_up_and_tiles()
  {
    let mesh = plane(10.0);

    assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0] && v.position[1] == 0.0));
    assert!(mesh.vertices.iter().any(|v| v.uv == [10.0, 10.0]));
    assert_outward_winding(&mesh);
  }

  #[test]
  fn sphere_vertices_lie_on_unit_sphere()
  {
    let mesh = sphere(16, 8);

    assert_eq!(mesh.vertices.len(), 17 * 9);
    assert_eq!(mesh.indices.len(), 16 * 8 * 6);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));

    for v in &mesh.vertices
    {
      assert!((Vec3::from_array(v.position).length() - 1.0).abs() < 1e-5);
    }

    assert_outward_winding(&mesh);
  }

  #[test]
  fn plane_tangent_follows_texture_axes()
  {
    for uv_scale in [1.0, 10.0]
    {
      let frame = surface_tangent(&plane(uv_scale)).unwrap();
      assert!(frame.truncate().abs_diff_eq(Vec3::X, 1e-6));

      // u runs along +X and v along +Z, so the top image row lies towards -Z
      let bitangent = Vec3::Y.cross(frame.truncate()) * frame.w;
      assert!(bitangent.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
  }

  #[test]
  fn degenerate_uvs_have_no_tangent()
  {
    let mut mesh = plane(1.0);
    for v in &mut mesh.vertices
    {
      v.uv = [0.5, 0.5];
    }

    assert_eq!(surface_tangent(&mesh), None);
    assert_eq!(surface_tangent(&MeshData::default()), None);
  }

  #[test]
  fn instance_layout_follows_vertex_attributes()
  {
    let layout = InstanceRaw::layout();
    let locations: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();

    assert_eq!(locations, vec![3, 4, 5, 6]);
    assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
  }
}
