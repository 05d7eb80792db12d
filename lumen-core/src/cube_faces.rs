use glam::{Mat4, Vec3};

//
// ──────────────────────────────────────────────────────────────
//   Cube-map faces
//
//   Layer order matches the texture array layers of a cube map:
//     +X, -X, +Y, -Y, +Z, -Z
//
//   Rendering a face uses the classic per-face look-at table plus
//   a Y-flipped 90° projection, so that texel rows come out in the
//   same orientation the cube sampler expects (row 0 at the top).
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace
{
  PositiveX,
  NegativeX,
  PositiveY,
  NegativeY,
  PositiveZ,
  NegativeZ,
}

impl CubeFace
{
  pub const ALL: [CubeFace; 6] = [
    CubeFace::PositiveX,
    CubeFace::NegativeX,
    CubeFace::PositiveY,
    CubeFace::NegativeY,
    CubeFace::PositiveZ,
    CubeFace::NegativeZ,
  ];

  pub fn layer(self) -> u32
  {
    match self
    {
      CubeFace::PositiveX => 0,
      CubeFace::NegativeX => 1,
      CubeFace::PositiveY => 2,
      CubeFace::NegativeY => 3,
      CubeFace::PositiveZ => 4,
      CubeFace::NegativeZ => 5,
    }
  }

  pub fn label(self) -> &'static str
  {
    match self
    {
      CubeFace::PositiveX => "+X",
      CubeFace::NegativeX => "-X",
      CubeFace::PositiveY => "+Y",
      CubeFace::NegativeY => "-Y",
      CubeFace::PositiveZ => "+Z",
      CubeFace::NegativeZ => "-Z",
    }
  }

  pub fn forward(self) -> Vec3
  {
    match self
    {
      CubeFace::PositiveX => Vec3::X,
      CubeFace::NegativeX => Vec3::NEG_X,
      CubeFace::PositiveY => Vec3::Y,
      CubeFace::NegativeY => Vec3::NEG_Y,
      CubeFace::PositiveZ => Vec3::Z,
      CubeFace::NegativeZ => Vec3::NEG_Z,
    }
  }

  pub fn up(self) -> Vec3
  {
    match self
    {
      CubeFace::PositiveY => Vec3::Z,
      CubeFace::NegativeY => Vec3::NEG_Z,
      _ => Vec3::NEG_Y,
    }
  }

  /// View matrix of a camera sitting at `centre` and facing this face.
  pub fn view_matrix(self, centre: Vec3) -> Mat4
  {
    Mat4::look_at_rh(centre, centre + self.forward(), self.up())
  }

  /// Direction sampled by texel coordinate (u, v) of this face, both in
  /// [0, 1] with v = 0 on the top row. Not normalised.
  pub fn texel_direction(self, u: f32, v: f32) -> Vec3
  {
    let sc = 2.0 * u - 1.0;
    let tc = 2.0 * v - 1.0;

    match self
    {
      CubeFace::PositiveX => Vec3::new(1.0, -tc, -sc),
      CubeFace::NegativeX => Vec3::new(-1.0, -tc, sc),
      CubeFace::PositiveY => Vec3::new(sc, 1.0, tc),
      CubeFace::NegativeY => Vec3::new(sc, -1.0, -tc),
      CubeFace::PositiveZ => Vec3::new(sc, -tc, 1.0),
      CubeFace::NegativeZ => Vec3::new(-sc, -tc, -1.0),
    }
  }
}

/// Square 90° projection for rendering one cube face.
pub fn capture_projection(znear: f32, zfar: f32) -> Mat4
{
  let flip_y = Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0));
  flip_y * Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, znear, zfar)
}

#[cfg(test)]
mod tests
{
  use super::*;

  const EPS: f32 = 1e-4;

  #[test]
  fn layers_are_unique_and_ordered()
  {
    for (i, face) in CubeFace::ALL.iter().enumerate()
    {
      assert_eq!(face.layer(), i as u32);
    }
  }

  #[test]
  fn face_view_looks_down_negative_z()
  {
    let centre = Vec3::new(0.0, 1.0, 0.0);

    for face in CubeFace::ALL
    {
      let view = face.view_matrix(centre);
      let ahead = view.transform_point3(centre + face.forward());

      assert!(ahead.abs_diff_eq(Vec3::NEG_Z, EPS), "{}: {ahead}", face.label());
    }
  }

  #[test]
  fn texel_centre_points_along_face_axis()
  {
    for face in CubeFace::ALL
    {
      let dir = face.texel_direction(0.5, 0.5);
      assert!(dir.abs_diff_eq(face.forward(), EPS));
    }
  }

  #[test]
  fn captured_texel_lands_where_sampler_reads_it()
  {
    let projection = capture_projection(0.1, 100.0);
    let samples = [(0.5, 0.5), (0.1, 0.2), (0.9, 0.3), (0.25, 0.8), (0.7, 0.95)];

    for face in CubeFace::ALL
    {
      let view_proj = projection * face.view_matrix(Vec3::ZERO);

      for (u, v) in samples
      {
        let dir = face.texel_direction(u, v);
        let ndc = view_proj.project_point3(dir);

        let rendered_u = (ndc.x + 1.0) * 0.5;
        let rendered_v = (1.0 - ndc.y) * 0.5;

        assert!((rendered_u - u).abs() < EPS, "{} u: {rendered_u} vs {u}", face.label());
        assert!((rendered_v - v).abs() < EPS, "{} v: {rendered_v} vs {v}", face.label());
      }
    }
  }
}
