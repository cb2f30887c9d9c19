//! Shared test utilities for integration tests
//!
//! A scripted movie provider that answers from canned JSON payloads, plus environment
//! isolation for tests that load layered configuration.

use async_trait::async_trait;
use reel::error::ApiError;
use reel::normalize::RawMovieEnvelope;
use reel::provider::MovieProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Notify;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Provider answering from a fixed id → payload table.
///
/// Ids without a payload fail with a request error. When gated, every fetch parks until
/// [`ScriptedProvider::open_gate`] is called, which lets tests observe in-flight state.
pub struct ScriptedProvider {
    payloads: HashMap<String, serde_json::Value>,
    calls: Mutex<HashMap<String, usize>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            payloads: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
            gate: None,
        }
    }

    pub fn with_payload(mut self, id: &str, payload: serde_json::Value) -> Self {
        self.payloads.insert(id.to_string(), payload);
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Release every parked fetch, and any fetch that arrives later.
    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_waiters();
            gate.notify_one();
        }
    }

    pub fn calls(&self, id: &str) -> usize {
        self.calls.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl MovieProvider for ScriptedProvider {
    async fn fetch_movie(&self, id: &str) -> Result<RawMovieEnvelope, ApiError> {
        *self.calls.lock().unwrap().entry(id.to_string()).or_insert(0) += 1;

        if let Some(gate) = &self.gate {
            gate.notified().await;
        } else {
            tokio::task::yield_now().await;
        }

        match self.payloads.get(id) {
            Some(payload) => serde_json::from_value(payload.clone())
                .map_err(|e| ApiError::ProviderError(format!("Failed to parse response: {}", e))),
            None => Err(ApiError::ProviderRequestFailed(format!(
                "no scripted payload for {}",
                id
            ))),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// The Dune payload used throughout the resolver tests
pub fn dune_payload() -> serde_json::Value {
    serde_json::json!({ "data": { "movie": {
        "name": "Dune",
        "durationMinutes": 155,
        "genres": [{ "name": "Sci-Fi" }]
    }}})
}

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(&'static str, Option<String>)>,
}

const ISOLATED_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "REEL_ENV",
    "REEL__PROVIDER__API_KEY",
    "REEL__PROVIDER__ENDPOINT",
    "REEL__RESOLVER__DEDUPE_IN_FLIGHT",
    "REEL__STORAGE__STORE_PATH",
];

impl EnvState {
    fn capture() -> Self {
        Self {
            saved: ISOLATED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.saved {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and the XDG directories pointed into `test_dir` and every `REEL`
/// variable cleared, restoring the original environment afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_home = test_dir.path().join("home");
    let test_config_home = test_dir.path().join("xdg-config");
    let test_data_home = test_dir.path().join("xdg-data");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_config_home).unwrap();
    std::fs::create_dir_all(&test_data_home).unwrap();

    for name in ISOLATED_VARS {
        std::env::remove_var(name);
    }
    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());
    std::env::set_var("XDG_DATA_HOME", test_data_home.to_str().unwrap());

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    env_state.restore();

    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
