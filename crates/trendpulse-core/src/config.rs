use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function, so the
/// parsing rules can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base = parse_api_base(&or_default("TRENDPULSE_API_BASE", DEFAULT_API_BASE))?;
    let log_level = or_default("TRENDPULSE_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("TRENDPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TRENDPULSE_USER_AGENT", "trendpulse/0.1 (demand-signals)");
    let stale_secs = parse_u64("TRENDPULSE_STALE_SECS", "60")?;
    let live_refetch_secs = parse_u64("TRENDPULSE_LIVE_REFETCH_SECS", "30")?;
    let retry_delay_ms = parse_u64("TRENDPULSE_RETRY_DELAY_MS", "1000")?;

    if live_refetch_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRENDPULSE_LIVE_REFETCH_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        api_base,
        log_level,
        request_timeout_secs,
        user_agent,
        stale_secs,
        live_refetch_secs,
        retry_delay_ms,
    })
}

/// Accepts only absolute `http(s)` origins and strips trailing slashes so
/// source paths can be appended verbatim.
fn parse_api_base(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());
    if !has_scheme || !has_host {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRENDPULSE_API_BASE".to_string(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
