//! Validator configuration loaded from `agile-docs.toml`

use crate::error::{DocsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "agile-docs.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Validation behavior
    #[serde(default)]
    pub validation: ValidationSettings,
}

/// Validation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Assert `format` keywords such as `date-time` instead of treating them as annotations
    #[serde(default)]
    pub validate_formats: bool,

    /// Run referential-integrity checks after structural validation
    #[serde(default)]
    pub semantic: bool,

    /// Fail on high-severity semantic findings
    #[serde(default)]
    pub strict: bool,

    /// Schema file to use instead of the bundled one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,
}

impl ValidationSettings {
    /// Apply command-line flags; flags can only enable options
    pub fn with_flags(
        mut self,
        validate_formats: bool,
        semantic: bool,
        strict: bool,
        schema: Option<PathBuf>,
    ) -> Self {
        self.validate_formats |= validate_formats;
        self.semantic |= semantic || strict;
        self.strict |= strict;
        if schema.is_some() {
            self.schema = schema;
        }
        self
    }
}

impl DocsConfig {
    /// Load config from `agile-docs.toml` in the given directory
    ///
    /// A missing file yields the defaults.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path, which must exist
    ///
    /// A relative `schema` path is resolved against the config file's directory.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path).map_err(|e| {
            DocsError::Config(format!("cannot read {}: {}", config_path.display(), e))
        })?;

        let mut config: DocsConfig = toml::from_str(&content)
            .map_err(|e| DocsError::Config(format!("{}: {}", config_path.display(), e)))?;

        if let (Some(schema), Some(base)) = (&config.validation.schema, config_path.parent()) {
            if schema.is_relative() {
                config.validation.schema = Some(base.join(schema));
            }
        }

        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Save config as pretty TOML
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DocsError::Serialize(format!("TOML error: {}", e)))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}
