use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{PilotError, PilotResult};
use crate::readiness::polling::PollOptions;
use crate::readiness::stability::StabilityOptions;

const CONFIG_FILE: &str = "config.toml";
const CONFIG_ENV: &str = "PAGEPILOT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub stability: StabilityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for generic `wait_for` calls made by an executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    /// 0 polls until the condition holds.
    #[serde(default = "default_max_checks")]
    pub max_checks: u32,
    #[serde(default = "default_true")]
    pub reject_on_timeout: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            max_checks: default_max_checks(),
            reject_on_timeout: true,
        }
    }
}

impl PollingConfig {
    pub fn to_options(&self) -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(self.interval_ms),
            max_checks: self.max_checks,
            reject_on_timeout: self.reject_on_timeout,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityConfig {
    #[serde(default = "default_stability_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_stability_timeout_ms")]
    pub timeout_ms: u64,
    /// Off by default: a page that never settles is treated as "probably stable".
    #[serde(default)]
    pub reject_on_timeout: bool,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_stability_interval_ms(),
            timeout_ms: default_stability_timeout_ms(),
            reject_on_timeout: false,
        }
    }
}

impl StabilityConfig {
    pub fn to_options(&self) -> StabilityOptions {
        StabilityOptions {
            interval: Duration::from_millis(self.interval_ms),
            timeout: Duration::from_millis(self.timeout_ms),
            reject_on_timeout: self.reject_on_timeout,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_max_checks() -> u32 {
    50
}

fn default_stability_interval_ms() -> u64 {
    200
}

fn default_stability_timeout_ms() -> u64 {
    5000
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        tracing::debug!(path = %explicit, "config path taken from {CONFIG_ENV}");
        return Some(PathBuf::from(explicit));
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Some(candidate);
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        let candidate = cwd.join(CONFIG_FILE);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found in working directory");
            return Some(candidate);
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("pagepilot").join(CONFIG_FILE))
        .filter(|candidate| candidate.exists())
}

/// Loads `config.toml` from the usual locations, falling back to defaults when none exists.
pub fn load_config() -> PilotResult<AppConfig> {
    match resolve_config_path() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("no config.toml found; using defaults");
            Ok(AppConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> PilotResult<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PilotError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let config: AppConfig = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn save_config(config: &AppConfig, path: &Path) -> PilotResult<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
