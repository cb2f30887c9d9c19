//! CLI route: single route table and run context. Dispatches to the resolver, the record
//! store and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_movie_list_json, format_movie_list_text, format_movies_json, format_movies_text,
    format_store_status_json, format_store_status_text, StoreStatus,
};
use crate::config::{ConfigLoader, ReelConfig};
use crate::error::ApiError;
use crate::provider::{MovieProvider, RapidApiProvider};
use crate::resolver::MovieResolver;
use crate::store::{MovieStore, SledBackend};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Runtime context for CLI execution: config, record store and (lazily) the provider.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    config: ReelConfig,
    store_path: PathBuf,
    store: Arc<MovieStore>,
    provider: Option<Arc<dyn MovieProvider>>,
    color: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(config.validated()?, &workspace_root)
    }

    /// Create run context from an already loaded configuration.
    pub fn from_config(config: ReelConfig, workspace_root: &Path) -> Result<Self, ApiError> {
        let store_path = config.storage.resolve_store_path(workspace_root)?;
        std::fs::create_dir_all(&store_path)
            .map_err(|e| ApiError::StorageError(crate::error::StorageError::IoError(e)))?;

        let backend = Arc::new(SledBackend::open(&store_path)?);
        let store = Arc::new(MovieStore::new(backend));
        debug!(store_path = %store_path.display(), "Opened record store");

        Ok(Self {
            config,
            store_path,
            store,
            provider: None,
            color: true,
        })
    }

    /// Use this provider instead of building one from configuration.
    pub fn with_provider(mut self, provider: Arc<dyn MovieProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Enable or disable colored headings in text output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    pub fn store(&self) -> &MovieStore {
        &self.store
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Show { ids, format } => {
                let records = self.resolve(ids)?;
                if format == "json" {
                    format_movies_json(&records)
                } else {
                    Ok(format_movies_text(&records, self.color))
                }
            }
            Commands::List { format } => {
                let records = self.store.scan()?.records;
                if format == "json" {
                    format_movie_list_json(&records)
                } else {
                    Ok(format_movie_list_text(&records))
                }
            }
            Commands::Status { format } => {
                let status = self.status()?;
                if format == "json" {
                    format_store_status_json(&status)
                } else {
                    Ok(format_store_status_text(&status, self.color))
                }
            }
        }
    }

    fn provider(&self) -> Result<Arc<dyn MovieProvider>, ApiError> {
        match &self.provider {
            Some(provider) => Ok(Arc::clone(provider)),
            None => Ok(Arc::new(RapidApiProvider::new(self.config.provider.clone())?)),
        }
    }

    fn resolve(&self, ids: &[String]) -> Result<Vec<crate::record::MovieRecord>, ApiError> {
        let provider = self.provider()?;
        info!(
            provider = provider.provider_name(),
            count = ids.len(),
            "Resolving movies"
        );
        let resolver = MovieResolver::with_config(
            Arc::clone(&self.store),
            provider,
            self.config.resolver.clone(),
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ProviderError(format!("Failed to start runtime: {}", e)))?;
        Ok(runtime.block_on(resolver.resolve_many(ids)))
    }

    fn status(&self) -> Result<StoreStatus, ApiError> {
        let scan = self.store.scan()?;
        let records = scan.records;
        let distinct_ids = records
            .iter()
            .map(|record| record.id.as_str())
            .collect::<HashSet<_>>()
            .len();
        Ok(StoreStatus {
            store_path: self.store_path.display().to_string(),
            collection_key: self.store.key().to_string(),
            record_count: records.len(),
            distinct_ids,
            undecodable_records: scan.skipped,
            provider_endpoint: self.config.provider.endpoint.clone(),
            credentials_configured: self.config.provider.has_credentials(),
            dedupe_in_flight: self.config.resolver.dedupe_in_flight,
        })
    }
}
