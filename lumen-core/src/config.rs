use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, DEFAULT_SENSITIVITY, DEFAULT_SPEED};
use crate::error::ConfigError;

//
// ──────────────────────────────────────────────────────────────
//   Demo configuration (JSON)
//
//   Lookup order:
//     1. path in $LUMEN_CONFIG (must exist)
//     2. ./lumen.json (optional)
//     3. built-in defaults
//
//   Every field is optional in the file; missing ones take the
//   defaults below.
// ──────────────────────────────────────────────────────────────
//

pub const CONFIG_ENV_VAR: &str = "LUMEN_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "lumen.json";

/// Upper bound for `asteroids.count`; 64 bytes of instance data each.
pub const MAX_ASTEROIDS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumenConfig
{
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub assets_dir: PathBuf,
  pub asteroids: AsteroidConfig,
  pub reflection: ReflectionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig
{
  pub width: u32,
  pub height: u32,
  pub vsync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig
{
  pub movement_speed: f32,
  pub mouse_sensitivity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidConfig
{
  pub count: usize,
  pub radius: f32,
  /// Fixed seed for a repeatable field; random per run when absent.
  pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionConfig
{
  /// Edge length in texels of each captured cube face.
  pub capture_size: u32,
}

//
// ──────────────────────────────────────────────────────────────
//   Defaults
// ──────────────────────────────────────────────────────────────
//

impl Default for LumenConfig
{
  fn default() -> Self
  {
    Self {
      window: WindowConfig::default(),
      camera: CameraConfig::default(),
      assets_dir: PathBuf::from("assets"),
      asteroids: AsteroidConfig::default(),
      reflection: ReflectionConfig::default(),
    }
  }
}

impl Default for WindowConfig
{
  fn default() -> Self
  {
    Self { width: 800, height: 600, vsync: true }
  }
}

impl Default for CameraConfig
{
  fn default() -> Self
  {
    Self { movement_speed: DEFAULT_SPEED, mouse_sensitivity: DEFAULT_SENSITIVITY }
  }
}

impl Default for AsteroidConfig
{
  fn default() -> Self
  {
    Self { count: 100, radius: 10.0, seed: None }
  }
}

impl Default for ReflectionConfig
{
  fn default() -> Self
  {
    Self { capture_size: 1024 }
  }
}

//
// ──────────────────────────────────────────────────────────────
//   Loading
// ──────────────────────────────────────────────────────────────
//

impl LumenConfig
{
  pub fn load() -> Result<Self, ConfigError>
  {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR)
    {
      let path = PathBuf::from(path);
      log::info!("Loading config from ${CONFIG_ENV_VAR} = {}", path.display());
      return Self::load_from(&path);
    }

    let fallback = Path::new(DEFAULT_CONFIG_FILE);
    if fallback.is_file()
    {
      log::info!("Loading config from {}", fallback.display());
      return Self::load_from(fallback);
    }

    log::info!("No config file found, using defaults");
    Ok(Self::default())
  }

  pub fn load_from(path: &Path) -> Result<Self, ConfigError>
  {
    let text = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    parse(&text, path)
  }

  pub fn from_json(text: &str) -> Result<Self, ConfigError>
  {
    parse(text, Path::new("<inline>"))
  }

  pub fn validate(&self) -> Result<(), ConfigError>
  {
    if self.window.width == 0 || self.window.height == 0
    {
      return Err(invalid("window", "width and height must be non-zero"));
    }

    if self.camera.movement_speed < 0.0
    {
      return Err(invalid("camera.movement_speed", "must be a non-negative number"));
    }

    if self.camera.mouse_sensitivity < 0.0
    {
      return Err(invalid("camera.mouse_sensitivity", "must be a non-negative number"));
    }

    if self.asteroids.count > MAX_ASTEROIDS
    {
      return Err(ConfigError::Invalid {
        field: "asteroids.count",
        reason: format!("must be at most {MAX_ASTEROIDS}"),
      });
    }

    if self.asteroids.radius <= 0.0
    {
      return Err(invalid("asteroids.radius", "must be positive"));
    }

    if self.reflection.capture_size == 0
    {
      return Err(invalid("reflection.capture_size", "must be non-zero"));
    }

    Ok(())
  }

  pub fn apply_to_camera(&self, camera: &mut Camera)
  {
    camera.movement_speed = self.camera.movement_speed;
    camera.mouse_sensitivity = self.camera.mouse_sensitivity;
  }

  pub fn asset_path(&self, relative: &str) -> PathBuf
  {
    self.assets_dir.join(relative)
  }
}

fn parse(text: &str, origin: &Path) -> Result<LumenConfig, ConfigError>
{
  let config: LumenConfig = serde_json::from_str(text)
    .map_err(|source| ConfigError::Parse { path: origin.to_path_buf(), source })?;

  config.validate()?;
  Ok(config)
}

fn invalid(field: &'static str, reason: &str) -> ConfigError
{
  ConfigError::Invalid { field, reason: reason.to_string() }
}

#[cfg(test)]
mod tests
{
  use super::*;

  #[test]
  fn empty_object_yields_defaults()
  {
    let config = LumenConfig::from_json("{}").unwrap();
    assert_eq!(config, LumenConfig::default());
  }

  #[test]
  fn partial_sections_keep_other_defaults()
  {
    let config = LumenConfig::from_json(
      r#"{ "window": { "width": 1280 }, "asteroids": { "seed": 7 }, "assets_dir": "data" }"#,
    )
    .unwrap();

    assert_eq!(config.window.width, 1280);
    assert_eq!(config.window.height, 600);
    assert!(config.window.vsync);
    assert_eq!(config.asteroids.seed, Some(7));
    assert_eq!(config.asteroids.count, 100);
    assert_eq!(config.asset_path("textures/ground.jpg"), PathBuf::from("data/textures/ground.jpg"));
  }

  #[test]
  fn malformed_json_is_a_parse_error()
  {
    let err = LumenConfig::from_json("{ window: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn zero_sized_window_is_rejected()
  {
    let err = LumenConfig::from_json(r#"{ "window": { "height": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "window", .. }));
  }

  #[test]
  fn negative_speed_is_rejected()
  {
    let err = LumenConfig::from_json(r#"{ "camera": { "movement_speed": -1.0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "camera.movement_speed", .. }));
  }

  #[test]
  fn asteroid_count_is_bounded()
  {
    let err = LumenConfig::from_json(r#"{ "asteroids": { "count": 5000000000 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "asteroids.count", .. }));

    let at_limit = format!(r#"{{ "asteroids": {{ "count": {MAX_ASTEROIDS} }} }}"#);
    assert_eq!(LumenConfig::from_json(&at_limit).unwrap().asteroids.count, MAX_ASTEROIDS);

    let zero = LumenConfig::from_json(r#"{ "asteroids": { "count": 0 } }"#).unwrap();
    assert_eq!(zero.asteroids.count, 0);
  }

  #[test]
  fn missing_file_is_a_read_error()
  {
    let err = LumenConfig::load_from(Path::new("definitely/not/here/lumen.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }

  #[test]
  fn camera_settings_are_applied()
  {
    let config =
      LumenConfig::from_json(r#"{ "camera": { "movement_speed": 6.0, "mouse_sensitivity": 0.25 } }"#)
        .unwrap();

    let mut camera = Camera::default();
    config.apply_to_camera(&mut camera);

    assert_eq!(camera.movement_speed, 6.0);
    assert_eq!(camera.mouse_sensitivity, 0.25);
  }
}
