use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base, "http://localhost:8000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "trendpulse/0.1 (demand-signals)");
    assert_eq!(cfg.stale_time(), Duration::from_secs(60));
    assert_eq!(cfg.live_refetch_interval(), Duration::from_secs(30));
    assert_eq!(cfg.retry_delay(), Duration::from_millis(1000));
}

#[test]
fn api_base_trailing_slash_is_stripped() {
    let mut map = HashMap::new();
    map.insert("TRENDPULSE_API_BASE", "https://demand.example.com/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base, "https://demand.example.com");
}

#[test]
fn api_base_without_scheme_is_rejected() {
    let mut map = HashMap::new();
    map.insert("TRENDPULSE_API_BASE", "localhost:8000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDPULSE_API_BASE"),
        "expected InvalidEnvVar(TRENDPULSE_API_BASE), got: {result:?}"
    );
}

#[test]
fn api_base_without_host_is_rejected() {
    let mut map = HashMap::new();
    map.insert("TRENDPULSE_API_BASE", "http://");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("TRENDPULSE_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("TRENDPULSE_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDPULSE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TRENDPULSE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn zero_refetch_interval_is_rejected() {
    let mut map = HashMap::new();
    map.insert("TRENDPULSE_LIVE_REFETCH_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRENDPULSE_LIVE_REFETCH_SECS"),
        "expected InvalidEnvVar(TRENDPULSE_LIVE_REFETCH_SECS), got: {result:?}"
    );
}

#[test]
fn retry_delay_may_be_zero() {
    let mut map = HashMap::new();
    map.insert("TRENDPULSE_RETRY_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.retry_delay(), Duration::ZERO);
}
