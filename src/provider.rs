//! Movie Provider Abstraction
//!
//! Contract for the external service that supplies raw movie detail payloads, plus the
//! reqwest-backed client for RapidAPI-style providers that authenticate with a key header
//! and a host header.

use crate::error::ApiError;
use crate::normalize::RawMovieEnvelope;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub mod profile;

pub use profile::{ProviderConfig, ProviderCredentials};

/// Source of raw movie data
#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Fetch the raw detail payload for a movie identifier
    async fn fetch_movie(&self, id: &str) -> Result<RawMovieEnvelope, ApiError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

// Helper function to map HTTP errors to ApiError
fn map_http_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::ProviderRequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ApiError::ProviderRequestFailed(format!("Connection error: {}", error))
    } else {
        ApiError::ProviderError(format!("HTTP error: {}", error))
    }
}

fn map_status_error(status: reqwest::StatusCode, body: String, id: &str) -> ApiError {
    match status.as_u16() {
        401 | 403 => ApiError::ProviderAuthFailed(format!("Authentication failed: {}", body)),
        429 => ApiError::ProviderRateLimit(format!("Rate limit exceeded: {}", body)),
        404 => ApiError::ProviderMovieNotFound(id.to_string()),
        _ => ApiError::ProviderRequestFailed(format!(
            "Request failed with status {}: {}",
            status, body
        )),
    }
}

fn build_provider_http_client(config: &ProviderConfig) -> Result<Client, ApiError> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs));
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

/// HTTP client for a RapidAPI movie detail endpoint
pub struct RapidApiProvider {
    client: Client,
    config: ProviderConfig,
    credentials: ProviderCredentials,
}

impl RapidApiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;
        let credentials = config.credentials()?;
        let client = build_provider_http_client(&config)?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl MovieProvider for RapidApiProvider {
    async fn fetch_movie(&self, id: &str) -> Result<RawMovieEnvelope, ApiError> {
        debug!(
            movie_id = %id,
            endpoint = %self.config.endpoint,
            "Fetching movie from provider"
        );

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[(self.config.id_param.as_str(), id)])
            .header(self.config.key_header.as_str(), &self.credentials.api_key)
            .header(self.config.host_header.as_str(), &self.credentials.api_host)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_status_error(status, error_text, id));
        }

        let body = response.text().await.map_err(map_http_error)?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e)))
    }

    fn provider_name(&self) -> &str {
        "rapidapi"
    }
}
