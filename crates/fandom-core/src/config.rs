use std::path::PathBuf;

use crate::app_config::RuntimeConfig;
use crate::ConfigError;

pub(crate) const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load runtime configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a numeric variable does not parse.
pub fn load_runtime_config() -> Result<RuntimeConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_runtime_config_from_env()
}

/// Load runtime configuration from environment variables already in the process.
///
/// Unlike [`load_runtime_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a numeric variable does not parse.
pub fn load_runtime_config_from_env() -> Result<RuntimeConfig, ConfigError> {
    build_runtime_config(|key| std::env::var(key))
}

/// Build runtime configuration using the provided env-var lookup function.
///
/// Empty values are treated the same as unset ones, which is how the hosting
/// platform passes "not configured".
fn build_runtime_config<F>(lookup: F) -> Result<RuntimeConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_owned()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("FANDOM_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("FANDOM_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("FANDOM_USER_AGENT", DEFAULT_USER_AGENT);
    let inter_item_delay_ms = parse_u64("FANDOM_INTER_ITEM_DELAY_MS", "2000")?;
    let instagram_base_url = or_default("FANDOM_INSTAGRAM_BASE_URL", "https://i.instagram.com");

    let apify_token = optional("APIFY_TOKEN");
    let dataset_id = optional("APIFY_DEFAULT_DATASET_ID");
    let apify_api_base_url = or_default("APIFY_API_BASE_URL", "https://api.apify.com");
    let local_storage_dir = PathBuf::from(or_default("APIFY_LOCAL_STORAGE_DIR", "./storage"));
    let key_value_store_id = or_default("APIFY_DEFAULT_KEY_VALUE_STORE_ID", "default");

    Ok(RuntimeConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        inter_item_delay_ms,
        instagram_base_url,
        apify_token,
        dataset_id,
        apify_api_base_url,
        local_storage_dir,
        key_value_store_id,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
