use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{ENV_BACKEND, ENV_DOMAIN, ENV_ROOT};
use crate::error::{Error, Result};
use crate::storage::backend::BackendKind;
use crate::storage::file::default_root;
use crate::storage::local::LocalStorage;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// How a [`LocalStorage`] should be built
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Engine to use
    pub backend: BackendKind,
    /// Base root for file storage; the temp-dir default when unset
    pub root: Option<PathBuf>,
    /// Domain scope applied after opening
    pub domain: Option<String>,
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| Error::UnsupportedConfigFormat(path.display().to_string()))?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, "read_config", path))?;
        let config = Self::parse(&content, format)
            .map_err(|message| Error::config(Some(path.to_path_buf()), message))?;
        debug!("Loaded storage config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> std::result::Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(data)
                .map_err(|e| format!("Failed to deserialize from JSON: {}", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data)
                .map_err(|e| format!("Failed to deserialize from YAML: {}", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data)
                .map_err(|e| format!("Failed to deserialize from TOML: {}", e)),
        }
    }

    /// Override fields from `KEYSTASH_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Override fields from a variable lookup. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(root) = var(ENV_ROOT) {
            self.root = Some(PathBuf::from(root));
        }
        if let Some(domain) = var(ENV_DOMAIN) {
            self.domain = Some(domain);
        }
        if let Some(backend) = var(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        Ok(())
    }

    /// Root the file engine will use
    pub fn effective_root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(default_root)
    }

    /// Build the facade this configuration describes.
    pub fn open(&self) -> Result<LocalStorage> {
        let mut storage = match self.backend {
            BackendKind::File => LocalStorage::file(self.effective_root())?,
            BackendKind::Memory => LocalStorage::memory(),
        };
        if let Some(domain) = &self.domain {
            storage.domain(domain)?;
        }
        Ok(storage)
    }
}
