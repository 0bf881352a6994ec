//! Dashboard configuration, optionally loaded from a JSON file

use anyhow::Context;
use eeg_simulation::{AnalysisConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON configuration file
pub const CONFIG_ENV_VAR: &str = "EEG_DASHBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub session: SessionConfig,
    pub analysis: AnalysisConfig,
    pub window: WindowConfig,
}

impl DashboardConfig {
    /// Load from the file named by `EEG_DASHBOARD_CONFIG`, or use defaults
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.session.validate()?;
        self.analysis.validate()?;
        Ok(())
    }
}
