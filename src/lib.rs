//! reel: cache-first movie details
//!
//! Fetches movie details from a third-party provider, normalizes them into a stable
//! record shape, and keeps them in a local sled-backed store so repeat lookups never
//! touch the network.

pub mod cli;
pub mod config;
pub mod error;
mod lenient;
pub mod logging;
pub mod normalize;
pub mod provider;
pub mod record;
pub mod resolver;
pub mod store;
