use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use hdrscope_core::scope::ScopeViewConfig;

const CONFIG_FILE: &str = "hdrscope.toml";

/// GUI presentation preferences. Engine-owned settings (log consent, LUT
/// state) stay behind typed bridge commands and are not persisted here.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Transform preset label applied when a preset list loads.
    pub default_transform: Option<String>,
    pub scope: ScopeViewConfig,
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE))
}

impl GuiConfig {
    /// Load preferences, falling back to defaults on any failure.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(error) => {
                warn!("config load failed: {error:#}");
                Self::default()
            }
        }
    }

    fn try_load() -> anyhow::Result<Option<Self>> {
        let path = config_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }

    /// Persist preferences. Failures are logged, never surfaced.
    pub fn save(&self) {
        if let Err(error) = self.try_save() {
            warn!("config save failed: {error:#}");
        }
    }

    fn try_save(&self) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self).context("serializing config")?;
        let path = config_path();
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
