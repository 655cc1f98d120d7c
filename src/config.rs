//! Configuration file support for io-manager.
//!
//! Provides YAML-based configuration through `io-manager.config.yml` files,
//! including data structures, file loading, validation and resolution
//! against command-line overrides.

use anyhow::{bail, Context};
use io_manager::shared::Result;
use io_manager::stream::{ErrorPolicy, ObjectCodec, OpenFailureMode, StreamOptions};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "io-manager.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub error_policy: Option<ErrorPolicy>,
    pub object_codec: Option<ObjectCodec>,
    pub max_read_bytes: Option<u64>,
    pub allow_symlinks: Option<bool>,
    pub open_failure: Option<OpenFailureMode>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Settings after merging defaults, the config file and CLI flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub policy: ErrorPolicy,
    pub options: StreamOptions,
}

impl ConfigFile {
    /// Resolves the effective settings.
    ///
    /// Precedence: CLI policy over file policy. The legacy policy turns
    /// open failures into warnings unless the file sets `open_failure`.
    pub fn resolve(&self, cli_policy: Option<ErrorPolicy>) -> Settings {
        let defaults = StreamOptions::default();
        let policy = cli_policy.or(self.error_policy).unwrap_or_default();

        let mut options = policy.apply(StreamOptions {
            codec: self.object_codec.unwrap_or(defaults.codec),
            max_read_bytes: self.max_read_bytes.unwrap_or(defaults.max_read_bytes),
            allow_symlinks: self.allow_symlinks.unwrap_or(defaults.allow_symlinks),
            open_failure: defaults.open_failure,
        });
        if let Some(open_failure) = self.open_failure {
            options.open_failure = open_failure;
        }

        Settings { policy, options }
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.max_read_bytes == Some(0) {
        bail!(
            "Invalid config: max_read_bytes must be greater than 0.\n\n\
             💡 Hint: Omit the field to use the default limit of 100 MB."
        );
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!("⚠️  Warning: Unknown config field '{}' will be ignored.", key);
    }
}
