// src/config/loader.rs
//! Layered configuration loader: defaults, TOML files, then environment

use crate::config::{constants::paths, MonitorConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),
    #[error("configuration parse error: {0}")]
    Parse(String),
    #[error("configuration validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Configuration loader merging several sources
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_overrides: Vec<(String, String)>,
}

impl ConfigLoader {
    /// Loader over the standard search paths and the process environment
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            env_overrides: std::env::vars().collect(),
        }
    }

    /// Loader with explicit paths; environment overrides still apply
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            env_overrides: std::env::vars().collect(),
        }
    }

    /// Replace the environment snapshot used for overrides
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_overrides = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Load, merge and validate the configuration
    pub fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let mut merged = toml::Value::try_from(MonitorConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        for config_path in &self.config_paths {
            match self.load_config_file(config_path) {
                Ok(file_config) => {
                    debug!(path = %config_path.display(), "merging configuration file");
                    merge_toml_values(&mut merged, file_config);
                }
                // Search paths are optional
                Err(ConfigError::FileNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        self.apply_environment_overrides(&mut merged);

        let config: MonitorConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(format!("Failed to deserialize config: {}", e)))?;
        config.validate()?;

        Ok(config)
    }

    /// Load a single required file on top of the defaults
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<MonitorConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        Self::with_paths(vec![path.to_path_buf()]).load()
    }

    /// Write a configuration out as TOML
    pub fn export_config<P: AsRef<Path>>(config: &MonitorConfig, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut paths_found = vec![PathBuf::from(paths::LOCAL_CONFIG_FILE)];
        if let Some(home) = std::env::var_os("HOME") {
            paths_found.push(
                PathBuf::from(home)
                    .join(paths::USER_CONFIG_DIR)
                    .join(paths::USER_CONFIG_FILE),
            );
        }
        paths_found
    }

    fn load_config_file(&self, path: &Path) -> Result<toml::Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: toml::Value = toml::from_str(&content)?;
        Ok(config)
    }

    /// `MYO_DISPLAY_PLOT_POINTS=500` sets `display.plot_points`
    ///
    /// A field that currently holds a string keeps the raw text, so
    /// `MYO_SIMULATOR_DEVICE_NAME=1234` stays a name.
    fn apply_environment_overrides(&self, config: &mut toml::Value) {
        for (key, value) in &self.env_overrides {
            let Some(rest) = key.strip_prefix(paths::ENV_PREFIX) else {
                continue;
            };
            let rest = rest.to_lowercase();
            let Some((section, field)) = rest.split_once('_') else {
                continue;
            };

            if let toml::Value::Table(root) = config {
                if let Some(toml::Value::Table(table)) = root.get_mut(section) {
                    debug!(section, field, "applying environment override");
                    let parsed = match (table.get(field), parse_env_value(value)) {
                        (Some(toml::Value::String(_)), _) => toml::Value::String(value.clone()),
                        (Some(toml::Value::Float(_)), toml::Value::Integer(i)) => toml::Value::Float(i as f64),
                        (_, parsed) => parsed,
                    };
                    table.insert(field.to_string(), parsed);
                }
            }
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}
