//! Merge rules: defaults, override order, conflict handling.

use crate::provider::profile::{DEFAULT_ENDPOINT, DEFAULT_ID_PARAM};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key: defaults, then the global file, then
/// workspace files, then `REEL__*` environment variables.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("provider.endpoint", DEFAULT_ENDPOINT)?
        .set_default("provider.id_param", DEFAULT_ID_PARAM)?
        .set_default("resolver.dedupe_in_flight", true)?
        .set_default("logging.level", "info")
}
