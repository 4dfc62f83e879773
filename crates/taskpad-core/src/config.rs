use anyhow::{
  Context,
  anyhow
};
use serde::Deserialize;
use tracing::debug;

use crate::storage::DEFAULT_STORAGE_KEY;

#[derive(
  Debug, Clone, PartialEq, Eq, Deserialize,
)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
  /// Storage entry holding the
  /// serialized task list.
  pub storage_key:      String,
  /// Entry animation offset per list
  /// position.
  pub entry_stagger_ms: u64
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      storage_key:      DEFAULT_STORAGE_KEY
        .to_string(),
      entry_stagger_ms: 50
    }
  }
}

impl AppConfig {
  #[tracing::instrument(skip(raw))]
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut cfg: AppConfig =
      toml::from_str(raw).context(
        "failed to parse taskpad \
         config"
      )?;

    cfg.storage_key =
      cfg.storage_key.trim().to_string();
    if cfg.storage_key.is_empty() {
      return Err(anyhow!(
        "storage_key cannot be empty"
      ));
    }

    debug!(
      storage_key = %cfg.storage_key,
      entry_stagger_ms = cfg.entry_stagger_ms,
      "loaded config"
    );
    Ok(cfg)
  }
}
