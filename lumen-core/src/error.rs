use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError
{
  #[error("failed to read config file {path}")]
  Read
  {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config file {path}")]
  Parse
  {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid config value `{field}`: {reason}")]
  Invalid
  {
    field: &'static str,
    reason: String,
  },
}
