//! Status presentation: record store and provider summary.

use super::heading;
use crate::error::{ApiError, StorageError};
use comfy_table::Table;
use serde::Serialize;

/// Snapshot reported by `reel status`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoreStatus {
    pub store_path: String,
    pub collection_key: String,
    pub record_count: usize,
    pub distinct_ids: usize,
    /// Stored elements that do not decode as movie records
    pub undecodable_records: usize,
    pub provider_endpoint: String,
    pub credentials_configured: bool,
    pub dedupe_in_flight: bool,
}

impl StoreStatus {
    /// Records beyond the first for some id
    pub fn duplicate_records(&self) -> usize {
        self.record_count.saturating_sub(self.distinct_ids)
    }
}

pub fn format_store_status_text(status: &StoreStatus, color: bool) -> String {
    let mut out = format!("{}\n\n", heading("Store", color));
    let mut store = Table::new();
    store.load_preset(comfy_table::presets::UTF8_FULL);
    store.add_row(vec!["Path".to_string(), status.store_path.clone()]);
    store.add_row(vec!["Key".to_string(), status.collection_key.clone()]);
    store.add_row(vec!["Records".to_string(), status.record_count.to_string()]);
    store.add_row(vec!["Distinct ids".to_string(), status.distinct_ids.to_string()]);
    out.push_str(&store.to_string());
    if status.duplicate_records() > 0 {
        out.push_str(&format!(
            "\n{} duplicate record(s); lookups return the first inserted.",
            status.duplicate_records()
        ));
    }
    if status.undecodable_records > 0 {
        out.push_str(&format!(
            "\n{} stored element(s) could not be read and are skipped.",
            status.undecodable_records
        ));
    }

    out.push_str(&format!("\n\n{}\n\n", heading("Provider", color)));
    let mut provider = Table::new();
    provider.load_preset(comfy_table::presets::UTF8_FULL);
    provider.add_row(vec!["Endpoint".to_string(), status.provider_endpoint.clone()]);
    provider.add_row(vec![
        "Credentials".to_string(),
        if status.credentials_configured {
            "configured".to_string()
        } else {
            "missing".to_string()
        },
    ]);
    provider.add_row(vec![
        "In-flight dedupe".to_string(),
        if status.dedupe_in_flight { "on" } else { "off" }.to_string(),
    ]);
    out.push_str(&provider.to_string());
    out
}

pub fn format_store_status_json(status: &StoreStatus) -> Result<String, ApiError> {
    serde_json::to_string_pretty(status)
        .map_err(|e| ApiError::StorageError(StorageError::Serialization(e)))
}
