//! Layered configuration: optional TOML file, then `REPERIBILI_*` variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use reperibili_core::day::DEFAULT_CUTOVER_HOUR;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite database file.
  pub store_path:   PathBuf,
  /// Platform used when `--platform` is not given.
  pub platform:     String,
  /// Hour (0-23) at which the rotation rolls over to the next day.
  pub cutover_hour: u32,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:   PathBuf::from("reperibili.db"),
      platform:     "CDN".to_owned(),
      cutover_hour: DEFAULT_CUTOVER_HOUR,
    }
  }
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("REPERIBILI"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}
