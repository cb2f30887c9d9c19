//! Configuration System
//!
//! Layered configuration for the provider, the record store, the resolver and logging.
//! Sources are merged with the `config` crate: built-in defaults, the global config file,
//! workspace config files, then `REEL__SECTION__KEY` environment variables.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use config::{Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::provider::ProviderConfig;
pub use crate::resolver::ResolverConfig;

mod merge {
    pub mod merge_policy;
}

mod sources {
    pub mod global_file;
    pub mod workspace_file;
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelConfig {
    /// Movie provider endpoint and credentials
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Record store location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Resolution behavior
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Sled database directory. Relative paths resolve against the workspace root;
    /// when unset the platform data directory is used.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_store_path(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        match &self.store_path {
            Some(path) if path.as_os_str().is_empty() => Err(ApiError::ConfigError(
                "Store path cannot be empty".to_string(),
            )),
            Some(path) if path.is_absolute() => Ok(path.clone()),
            Some(path) => Ok(workspace_root.join(path)),
            None => default_store_path(),
        }
    }
}

/// `<platform data dir>/store`, e.g. `~/.local/share/reel/store` on Linux
pub fn default_store_path() -> Result<PathBuf, ApiError> {
    ProjectDirs::from("", "", "reel")
        .map(|dirs| dirs.data_dir().join("store"))
        .ok_or_else(|| {
            ApiError::ConfigError("Could not determine a data directory for the store".to_string())
        })
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Provider(String),
    Storage(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ReelConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }

        if matches!(&self.storage.store_path, Some(path) if path.as_os_str().is_empty()) {
            errors.push(ValidationError::Storage(
                "Store path cannot be empty".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all errors into a single `ApiError`
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}

/// Loads [`ReelConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace: defaults, global file, workspace files, env.
    pub fn load(workspace_root: &Path) -> Result<ReelConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let config = builder
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<ReelConfig>()?;
        Ok(config)
    }

    /// Load configuration from one explicit file (plus defaults and env).
    pub fn load_from_file(path: &Path) -> Result<ReelConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = merge::merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<ReelConfig>()?;
        Ok(config)
    }

    /// Path of the global config file, if a home or XDG config directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        sources::global_file::global_config_path()
    }

    fn environment() -> Environment {
        Environment::with_prefix("REEL")
            .separator("__")
            .try_parsing(true)
    }
}
