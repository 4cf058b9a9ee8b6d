//! Configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::menu::PARTIAL_MAX_MISSING;
use crate::pantry::{DEFAULT_EXPIRY_WINDOW_DAYS, MAX_EXPIRY_WINDOW_DAYS};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BistroConfig {
    /// Directory holding `pantry.json` and `recipes.json`.
    pub data_dir: PathBuf,
    /// Most required ingredients a recipe may miss and still be listed.
    pub partial_max_missing: usize,
    /// Days ahead counted as "expiring soon".
    pub expiry_window_days: i64,
    /// Whether suggestions draw from cookable recipes first.
    pub prefer_available: bool,
}

impl Default for BistroConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            partial_max_missing: PARTIAL_MAX_MISSING,
            expiry_window_days: DEFAULT_EXPIRY_WINDOW_DAYS,
            prefer_available: true,
        }
    }
}

impl BistroConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `BISTRO_DATA_DIR`: Data directory (default: "~/.bistro")
    /// - `BISTRO_PARTIAL_MAX_MISSING`: Partial-match ceiling, at least 1 (default: 3)
    /// - `BISTRO_EXPIRY_WINDOW_DAYS`: Expiring-soon window, 0 to 36500 (default: 7)
    /// - `BISTRO_PREFER_AVAILABLE`: `true`/`1`/`false`/`0` (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`BistroConfig::from_env`] with variables read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("BISTRO_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let partial_max_missing: usize = parse_var(&lookup, "BISTRO_PARTIAL_MAX_MISSING")?
            .unwrap_or(defaults.partial_max_missing);
        if partial_max_missing == 0 {
            return Err(ConfigError::InvalidValue {
                var: "BISTRO_PARTIAL_MAX_MISSING".to_string(),
                value: "0".to_string(),
            });
        }

        let expiry_window_days: i64 = parse_var(&lookup, "BISTRO_EXPIRY_WINDOW_DAYS")?
            .unwrap_or(defaults.expiry_window_days);
        if !(0..=MAX_EXPIRY_WINDOW_DAYS).contains(&expiry_window_days) {
            return Err(ConfigError::InvalidValue {
                var: "BISTRO_EXPIRY_WINDOW_DAYS".to_string(),
                value: expiry_window_days.to_string(),
            });
        }

        let prefer_available = match lookup("BISTRO_PREFER_AVAILABLE") {
            None => defaults.prefer_available,
            Some(v) => parse_flag(&v).ok_or(ConfigError::InvalidValue {
                var: "BISTRO_PREFER_AVAILABLE".to_string(),
                value: v,
            })?,
        };

        Ok(Self {
            data_dir,
            partial_max_missing,
            expiry_window_days,
            prefer_available,
        })
    }

    /// Get the default data directory: ~/.bistro
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".bistro"))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn pantry_path(&self) -> PathBuf {
        self.data_dir.join("pantry.json")
    }

    pub fn recipes_path(&self) -> PathBuf {
        self.data_dir.join("recipes.json")
    }
}

fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value,
            }),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
