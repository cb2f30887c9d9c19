//! Provider profile: endpoint, credentials and HTTP behavior for the movie provider.

use crate::error::ApiError;
use reqwest::header::HeaderName;
use reqwest::Url;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://flixster.p.rapidapi.com/movies/detail";
pub const DEFAULT_ID_PARAM: &str = "emsVersionId";
pub const DEFAULT_KEY_HEADER: &str = "X-RapidAPI-Key";
pub const DEFAULT_HOST_HEADER: &str = "X-RapidAPI-Host";

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Movie detail endpoint; the identifier is sent as a query parameter
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Query parameter carrying the movie identifier
    #[serde(default = "default_id_param")]
    pub id_param: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Value of the host header; defaults to the endpoint's host
    #[serde(default)]
    pub api_host: Option<String>,

    #[serde(default = "default_key_header")]
    pub key_header: String,

    #[serde(default = "default_host_header")]
    pub host_header: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Honor HTTP(S)_PROXY environment settings
    #[serde(default = "default_true")]
    pub use_system_proxy: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_id_param() -> String {
    DEFAULT_ID_PARAM.to_string()
}

fn default_key_header() -> String {
    DEFAULT_KEY_HEADER.to_string()
}

fn default_host_header() -> String {
    DEFAULT_HOST_HEADER.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            id_param: default_id_param(),
            api_key: None,
            api_host: None,
            key_header: default_key_header(),
            host_header: default_host_header(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            use_system_proxy: default_true(),
        }
    }
}

/// Credentials sent with every provider request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub api_host: String,
}

impl ProviderConfig {
    /// Validate the shape of the configuration; credentials are checked separately.
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| format!("Invalid endpoint URL '{}': {}", self.endpoint, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "Endpoint must use http or https, got '{}'",
                url.scheme()
            ));
        }

        if self.id_param.trim().is_empty() {
            return Err("Identifier query parameter cannot be empty".to_string());
        }

        for header in [&self.key_header, &self.host_header] {
            HeaderName::from_bytes(header.as_bytes())
                .map_err(|_| format!("Invalid header name '{}'", header))?;
        }

        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("Timeouts must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Host header value: explicit `api_host`, else the endpoint's host.
    pub fn effective_host(&self) -> Option<String> {
        if let Some(host) = self.api_host.as_ref().filter(|h| !h.trim().is_empty()) {
            return Some(host.clone());
        }
        Url::parse(&self.endpoint)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    pub fn credentials(&self) -> Result<ProviderCredentials, ApiError> {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ApiError::ProviderNotConfigured(
                    "API key missing; set provider.api_key or REEL__PROVIDER__API_KEY".to_string(),
                )
            })?;
        let api_host = self.effective_host().ok_or_else(|| {
            ApiError::ProviderNotConfigured(
                "API host missing and endpoint has no host".to_string(),
            )
        })?;
        Ok(ProviderCredentials { api_key, api_host })
    }
}
