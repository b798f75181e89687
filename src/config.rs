//! User configuration (`config.toml`)
//!
//! Looked up at `$CALENDARIO_FISCAL_CONFIG`, else
//! `<config_home>/calendario-fiscal/config.toml`. A missing file means defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CalendarError, Result};
use crate::obligations::{Regime, DEFAULT_WINDOW_DAYS};

pub const CONFIG_ENV_VAR: &str = "CALENDARIO_FISCAL_CONFIG";
const CONFIG_DIR: &str = "calendario-fiscal";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Regime used when a command gets no `--regime`
    pub regime: Regime,
    /// Window for `upcoming` when no `--days` is given
    pub horizon_days: i64,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            regime: Regime::General,
            horizon_days: DEFAULT_WINDOW_DAYS,
            color: true,
        }
    }
}

/// Where the config file is expected, if a location can be determined
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dir_spec::config_home().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load the config from `path` (or the default location). Missing file -> defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => {
            debug!("No config directory available, using defaults");
            return Ok(Config::default());
        }
    };

    if !path.exists() {
        debug!("Config file {} not found, using defaults", path.display());
        return Ok(Config::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = parse_config(&raw)
        .with_context(|| format!("Invalid config file {}", path.display()))?;

    debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

fn parse_config(raw: &str) -> std::result::Result<Config, CalendarError> {
    let config: Config =
        toml::from_str(raw).map_err(|e| CalendarError::Config(e.message().to_string()))?;

    if config.horizon_days < 0 {
        return Err(CalendarError::Config(format!(
            "horizon_days must be zero or positive, got {}",
            config.horizon_days
        )));
    }

    Ok(config)
}
