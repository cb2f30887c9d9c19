//! Property-based tests for normalization and the record store
