//! Pure derivations over resolved source data.
//!
//! Every function recomputes its output from scratch; nothing here holds
//! state or touches the network. Inputs have already been normalized by the
//! gateway, so absent numbers are `0` and absent strings are empty.

mod alerts;
mod hashtags;
mod skus;
mod trends;
mod velocity;

pub use alerts::derived_alerts;
pub use hashtags::{aggregate_top_hashtags, snippet_for_hashtag, top_hashtags_for_view};
pub use skus::{critical_sku_count, kpi_rollup, trending_rows};
pub use trends::{rank_trend_keywords, source_shares};
pub use velocity::{source_velocity_buckets, velocity_series};

/// Number of hashtags shown in the top-hashtag list.
pub const TOP_HASHTAG_LIMIT: usize = 6;
/// Number of rows in the trending-SKU table.
pub const TRENDING_ROW_LIMIT: usize = 10;
/// Number of alerts synthesized from the social feed.
pub const ALERT_LIMIT: usize = 8;
