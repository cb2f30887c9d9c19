//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StorageError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StorageError(StorageError::CorruptCollection { .. }) => format!(
            "{}\nThe stored collection was left untouched; move the store directory aside to start over.",
            e
        ),
        _ => e.to_string(),
    }
}
