use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend origin without a trailing slash, e.g. `http://localhost:8000`.
    pub api_base: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// How long a successful fetch is considered fresh.
    pub stale_secs: u64,
    /// Fixed re-poll period for live trend and social sources.
    pub live_refetch_secs: u64,
    /// Delay before the single retry of a failed fetch.
    pub retry_delay_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }

    #[must_use]
    pub fn live_refetch_interval(&self) -> Duration {
        Duration::from_secs(self.live_refetch_secs)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
