use std::path::{Path, PathBuf};

use glam::Vec3;
use image::{Rgba, RgbaImage};
use lumen_core::cube_faces::CubeFace;

//
// ──────────────────────────────────────────────────────────────
//   Textures
//
//   Images decode to RGBA8 with row 0 at the top, which is also
//   where wgpu puts v = 0, so nothing is flipped on upload.
//
//   A missing or broken asset never aborts a demo: the `*_or`
//   loaders log a warning and substitute a generated image.
// ──────────────────────────────────────────────────────────────
//

#[derive(Debug, thiserror::Error)]
pub enum TextureError
{
  #[error("failed to load image {path}")]
  Decode
  {
    path: PathBuf,
    #[source]
    source: image::ImageError,
  },

  #[error("{label} is {width}x{height}, larger than the device limit of {max}")]
  TooLarge
  {
    label: String,
    width: u32,
    height: u32,
    max: u32,
  },

  #[error("cube map needs 6 faces, got {count}")]
  FaceCount
  {
    count: usize,
  },

  #[error("cube map face {face} is not square ({width}x{height})")]
  NotSquare
  {
    face: &'static str,
    width: u32,
    height: u32,
  },

  #[error("cube map face {face} is {size} texels wide, expected {expected}")]
  FaceMismatch
  {
    face: &'static str,
    size: u32,
    expected: u32,
  },
}

/// File names inside a skybox directory, in cube layer order (+X, -X, +Y, -Y, +Z, -Z).
pub const SKYBOX_FACES: [&str; 6] = ["right.jpg", "left.jpg", "top.jpg", "bottom.jpg", "front.jpg", "back.jpg"];

pub fn decode(path: &Path) -> Result<RgbaImage, TextureError>
{
  let image = image::open(path).map_err(|source| TextureError::Decode { path: path.to_path_buf(), source })?;
  Ok(image.to_rgba8())
}

//
// ──────────────────────────────────────────────────────────────
//   2D textures
// ──────────────────────────────────────────────────────────────
//

pub struct Texture
{
  pub texture: wgpu::Texture,
  pub view: wgpu::TextureView,
  pub sampler: wgpu::Sampler,
}

impl Texture
{
  /// `srgb` for colour data; masks such as specular maps stay linear.
  pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, image: &RgbaImage, srgb: bool) -> Self
  {
    let (width, height) = image.dimensions();
    let format = if srgb { wgpu::TextureFormat::Rgba8UnormSrgb } else { wgpu::TextureFormat::Rgba8Unorm };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
      label: Some(label),
      size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
      mip_level_count: 1,
      sample_count: 1,
      dimension: wgpu::TextureDimension::D2,
      format,
      usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
      view_formats: &[],
    });

    write_layer(queue, &texture, 0, image);

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = create_sampler(device, label, wgpu::AddressMode::Repeat);

    Self { texture, view, sampler }
  }

  pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path, srgb: bool) -> Result<Self, TextureError>
  {
    let image = decode(path)?;
    let label = path.display().to_string();
    log::debug!("Loaded {label} ({}x{})", image.width(), image.height());

    check_size(&label, image.width(), image.height(), device.limits().max_texture_dimension_2d)?;
    Ok(Self::from_image(device, queue, &label, &image, srgb))
  }

  pub fn load_or(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
    srgb: bool,
    fallback: impl FnOnce() -> RgbaImage,
  ) -> Self
  {
    match Self::load(device, queue, path, srgb)
    {
      Ok(texture) => texture,
      Err(err) =>
      {
        log::warn!("{}; using generated texture", error_chain(&err));
        Self::from_image(device, queue, &path.display().to_string(), &fallback(), srgb)
      }
    }
  }

  pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, rgba: [u8; 4]) -> Self
  {
    Self::from_image(device, queue, label, &solid(rgba), false)
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Cube maps
// ──────────────────────────────────────────────────────────────
//

pub struct CubeTexture
{
  pub texture: wgpu::Texture,
  pub view: wgpu::TextureView,
  pub sampler: wgpu::Sampler,
}

impl CubeTexture
{
  pub fn from_faces(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    faces: &[RgbaImage],
  ) -> Result<Self, TextureError>
  {
    let size = validate_faces(faces)?;
    check_size(label, size, size, device.limits().max_texture_dimension_2d)?;
    Ok(Self::upload(device, queue, label, size, faces))
  }

  fn upload(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, size: u32, faces: &[RgbaImage]) -> Self
  {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
      label: Some(label),
      size: wgpu::Extent3d { width: size, height: size, depth_or_array_layers: 6 },
      mip_level_count: 1,
      sample_count: 1,
      dimension: wgpu::TextureDimension::D2,
      format: wgpu::TextureFormat::Rgba8UnormSrgb,
      usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
      view_formats: &[],
    });

    for (face, image) in CubeFace::ALL.iter().zip(faces)
    {
      write_layer(queue, &texture, face.layer(), image);
    }

    Self::wrap(device, label, texture)
  }

  /// Six images named per `SKYBOX_FACES` inside `dir`.
  pub fn load_dir(device: &wgpu::Device, queue: &wgpu::Queue, dir: &Path) -> Result<Self, TextureError>
  {
    let mut faces = Vec::with_capacity(SKYBOX_FACES.len());

    for name in SKYBOX_FACES
    {
      faces.push(decode(&dir.join(name))?);
    }

    Self::from_faces(device, queue, &dir.display().to_string(), &faces)
  }

  pub fn load_or_sky(device: &wgpu::Device, queue: &wgpu::Queue, dir: &Path) -> Self
  {
    let err = match Self::load_dir(device, queue, dir)
    {
      Ok(cube) => return cube,
      Err(err) => err,
    };

    log::warn!("{}; using generated sky", error_chain(&err));

    Self::upload(device, queue, "Generated Sky", GENERATED_SKY_SIZE, &sky_faces(GENERATED_SKY_SIZE))
  }

  /// Wrap a texture with 6 layers (uploaded or rendered) as a samplable cube.
  pub fn wrap(device: &wgpu::Device, label: &str, texture: wgpu::Texture) -> Self
  {
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
      label: Some(label),
      dimension: Some(wgpu::TextureViewDimension::Cube),
      ..Default::default()
    });

    let sampler = create_sampler(device, label, wgpu::AddressMode::ClampToEdge);

    Self { texture, view, sampler }
  }
}

pub fn validate_faces(faces: &[RgbaImage]) -> Result<u32, TextureError>
{
  if faces.len() != CubeFace::ALL.len()
  {
    return Err(TextureError::FaceCount { count: faces.len() });
  }

  let expected = faces[0].width();

  for (face, image) in CubeFace::ALL.iter().zip(faces)
  {
    let (width, height) = image.dimensions();

    if width != height
    {
      return Err(TextureError::NotSquare { face: face.label(), width, height });
    }

    if width != expected
    {
      return Err(TextureError::FaceMismatch { face: face.label(), size: width, expected });
    }
  }

  Ok(expected)
}

/// Textures wider or taller than the device allows fail creation outright.
pub fn check_size(label: &str, width: u32, height: u32, max: u32) -> Result<(), TextureError>
{
  if width > max || height > max
  {
    return Err(TextureError::TooLarge { label: label.to_string(), width, height, max });
  }

  Ok(())
}

//
// ──────────────────────────────────────────────────────────────
//   Generated images
// ──────────────────────────────────────────────────────────────
//

pub fn solid(rgba: [u8; 4]) -> RgbaImage
{
  RgbaImage::from_pixel(1, 1, Rgba(rgba))
}

pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage
{
  let cell = (size / cells.max(1)).max(1);

  RgbaImage::from_fn(size, size, |x, y| if (x / cell + y / cell) % 2 == 0 { Rgba(a) } else { Rgba(b) })
}

/// Round opaque disc on a transparent background; exercises alpha blending.
pub fn disc(size: u32, rgba: [u8; 4]) -> RgbaImage
{
  let radius = size as f32 * 0.5;

  RgbaImage::from_fn(size, size, |x, y| {
    let d = Vec3::new(x as f32 + 0.5 - radius, y as f32 + 0.5 - radius, 0.0).length();
    if d <= radius * 0.8 { Rgba(rgba) } else { Rgba([0, 0, 0, 0]) }
  })
}

const GENERATED_SKY_SIZE: u32 = 256;

const ZENITH: Vec3 = Vec3::new(0.18, 0.35, 0.75);
const HORIZON: Vec3 = Vec3::new(0.75, 0.82, 0.90);
const GROUND: Vec3 = Vec3::new(0.22, 0.20, 0.18);
const SUN_COLOR: Vec3 = Vec3::new(1.0, 0.85, 0.55);

/// Gradient sky with a sun towards -Z, in cube layer order.
pub fn sky_faces(size: u32) -> Vec<RgbaImage>
{
  let sun = Vec3::new(0.3, 0.35, -1.0).normalize();

  CubeFace::ALL
    .iter()
    .map(|&face| {
      RgbaImage::from_fn(size, size, |x, y| {
        let u = (x as f32 + 0.5) / size as f32;
        let v = (y as f32 + 0.5) / size as f32;
        let dir = face.texel_direction(u, v).normalize();

        let sky = if dir.y >= 0.0 { HORIZON.lerp(ZENITH, dir.y.sqrt()) } else { HORIZON.lerp(GROUND, (-dir.y * 4.0).min(1.0)) };
        let glow = dir.dot(sun).max(0.0).powf(64.0);
        let color = (sky + SUN_COLOR * glow).min(Vec3::ONE);

        Rgba([(color.x * 255.0) as u8, (color.y * 255.0) as u8, (color.z * 255.0) as u8, 255])
      })
    })
    .collect()
}

//
// ──────────────────────────────────────────────────────────────
//   Helpers
// ──────────────────────────────────────────────────────────────
//

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, layer: u32, image: &RgbaImage)
{
  let (width, height) = image.dimensions();

  queue.write_texture(
    wgpu::TexelCopyTextureInfo {
      texture,
      mip_level: 0,
      origin: wgpu::Origin3d { x: 0, y: 0, z: layer },
      aspect: wgpu::TextureAspect::All,
    },
    image.as_raw(),
    wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(4 * width), rows_per_image: Some(height) },
    wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
  );
}

pub fn create_sampler(device: &wgpu::Device, label: &str, address_mode: wgpu::AddressMode) -> wgpu::Sampler
{
  device.create_sampler(&wgpu::SamplerDescriptor {
    label: Some(label),
    address_mode_u: address_mode,
    address_mode_v: address_mode,
    address_mode_w: address_mode,
    mag_filter: wgpu::FilterMode::Linear,
    min_filter: wgpu::FilterMode::Linear,
    ..Default::default()
  })
}

fn error_chain(err: &dyn std::error::Error) -> String
{
  let mut message = err.to_string();
  let mut source = err.source();

  while let Some(cause) = source
  {
    message.push_str(": ");
    message.push_str(&cause.to_string());
    source = cause.source();
  }

  message
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn missing_file_reports_its_path()
  {
    let err = decode(Path::new("no/such/texture.png")).unwrap_err();

    match &err
    {
      TextureError::Decode { path, .. } => assert_eq!(path, Path::new("no/such/texture.png")),
      other => panic!("unexpected error {other:?}"),
    }

    assert!(error_chain(&err).starts_with("failed to load image no/such/texture.png: "));
  }

  #[test]
  fn checkerboard_alternates_cells()
  {
    let white = [255; 4];
    let black = [0, 0, 0, 255];
    let image = checkerboard(8, 2, white, black);

    assert_eq!(image.get_pixel(0, 0).0, white);
    assert_eq!(image.get_pixel(4, 0).0, black);
    assert_eq!(image.get_pixel(4, 4).0, white);
  }

  #[test]
  fn disc_is_transparent_in_the_corners()
  {
    let image = disc(16, [255, 0, 0, 255]);

    assert_eq!(image.get_pixel(0, 0).0[3], 0);
    assert_eq!(image.get_pixel(8, 8).0, [255, 0, 0, 255]);
  }

  #[test]
  fn generated_sky_is_a_valid_cube()
  {
    let faces = sky_faces(8);
    assert_eq!(validate_faces(&faces).unwrap(), 8);

    // Zenith bluer than the ground
    let top = faces[CubeFace::PositiveY.layer() as usize].get_pixel(4, 4).0;
    let bottom = faces[CubeFace::NegativeY.layer() as usize].get_pixel(4, 4).0;
    assert!(top[2] > bottom[2]);
  }

  #[test]
  fn oversized_images_are_refused_before_upload()
  {
    assert!(check_size("wall.jpg", 2048, 1024, 8192).is_ok());
    assert!(check_size("edge.jpg", 8192, 8192, 8192).is_ok());

    let err = check_size("huge.jpg", 10_000, 10_000, 8192).unwrap_err();
    assert!(matches!(err, TextureError::TooLarge { width: 10_000, max: 8192, .. }));
    assert_eq!(err.to_string(), "huge.jpg is 10000x10000, larger than the device limit of 8192");

    // One oversized axis is enough
    assert!(check_size("strip.png", 16, 9000, 8192).is_err());
  }

  #[test]
  fn mismatched_faces_are_rejected()
  {
    let mut faces = sky_faces(4);
    faces[3] = RgbaImage::new(4, 2);
    assert!(matches!(validate_faces(&faces), Err(TextureError::NotSquare { face: "-Y", .. })));

    faces[3] = RgbaImage::new(8, 8);
    assert!(matches!(validate_faces(&faces), Err(TextureError::FaceMismatch { face: "-Y", size: 8, expected: 4 })));

    faces.pop();
    assert!(matches!(validate_faces(&faces), Err(TextureError::FaceCount { count: 5 })));
  }
}
