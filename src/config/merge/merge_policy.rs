//! Merge rules: defaults, override order, conflict handling.

use crate::provider::{
    DEFAULT_API_KEY_ENV, DEFAULT_API_VERSION, DEFAULT_ENDPOINT, DEFAULT_MAX_OUTPUT_TOKENS,
    DEFAULT_MODEL,
};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_STORE_PATH: &str = ".tarantino/store";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources (global file, workspace files, environment) override these.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("provider.model", DEFAULT_MODEL)?
        .set_default("provider.endpoint", DEFAULT_ENDPOINT)?
        .set_default("provider.api_version", DEFAULT_API_VERSION)?
        .set_default("provider.api_key_env", DEFAULT_API_KEY_ENV)?
        .set_default("provider.max_output_tokens", i64::from(DEFAULT_MAX_OUTPUT_TOKENS))?
        .set_default("provider.connect_timeout_secs", DEFAULT_CONNECT_TIMEOUT_SECS as i64)?
        .set_default("provider.request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?
        .set_default("storage.store_path", DEFAULT_STORE_PATH)
}
