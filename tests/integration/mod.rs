//! Integration tests for the reel movie record cache

mod config_integration;
mod store_integration;
pub mod test_utils;
