//! Canonical types and configuration shared by every trendpulse crate.

mod app_config;
mod config;
mod derived;
mod source;
mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use derived::{
    AlertStatus, DerivedAlert, HashtagCard, ImpactLevel, KpiSet, SourceShare, StockoutWindow,
    TrendingRow, VelocityBuckets, VelocityPoint,
};
pub use source::SourceKey;
pub use types::{
    HashtagAggregate, Signal, SignalSource, SkuMapping, SocialPost, TrendKeyword,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
