use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid estimator configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("sma_window must be at least 1 (got {0})")]
    WindowTooSmall(usize),
    #[error("sma_delta_secs must be positive and finite (got {0})")]
    InvalidDelta(f64),
}

fn default_sma_window() -> usize {
    10
}

fn default_sma_delta_secs() -> f64 {
    0.3
}

/// Estimator configuration, loadable from `~/.config/pacer/config.toml`.
///
/// Unknown keys are rejected at parse time. Open-ended display metadata goes
/// in `labels` instead of ad-hoc fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PacerConfig {
    /// Maximum number of time buckets retained; with `sma_delta_secs` this
    /// sets how far back the average looks (default 10 x 0.3s = 3s).
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,
    /// Width of one bucket in seconds (averaging granularity).
    #[serde(default = "default_sma_delta_secs")]
    pub sma_delta_secs: f64,
    /// Display-only metadata for subscribers (e.g. a job name or a units
    /// suffix); not interpreted by the estimator.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Default for PacerConfig {
    fn default() -> Self {
        PacerConfig {
            sma_window: default_sma_window(),
            sma_delta_secs: default_sma_delta_secs(),
            labels: BTreeMap::new(),
        }
    }
}

impl PacerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sma_window < 1 {
            return Err(ConfigError::WindowTooSmall(self.sma_window));
        }
        if !self.sma_delta_secs.is_finite() || self.sma_delta_secs <= 0.0 {
            return Err(ConfigError::InvalidDelta(self.sma_delta_secs));
        }
        Ok(())
    }

    /// Bucket width as a `Duration`. Panics on a delta that `validate` would
    /// reject, so validate hand-built configs first.
    pub fn sma_delta(&self) -> Duration {
        Duration::from_secs_f64(self.sma_delta_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pacer")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Parse and validate a config file.
pub fn load_from_path(path: &Path) -> Result<PacerConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: PacerConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PacerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PacerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}
