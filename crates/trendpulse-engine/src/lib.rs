//! Demand-signal engine: polls the backend sources, falls back to mock data
//! when they are empty or failing, and derives the dashboard views.
//!
//! Data flows gateway → [`PollingCache`] → [`fallback`] → [`aggregate`] →
//! [`view`]. [`Dashboard`] ties those stages together for a caller that only
//! wants reports.

pub mod aggregate;
pub mod cache;
mod dashboard;
pub mod error;
pub mod fallback;
pub mod mock;
mod retry;
pub mod view;

#[cfg(test)]
mod testing;

pub use cache::{FetchOutcome, FetchStatus, PollPolicy, PollingCache, SourceSnapshot};
pub use dashboard::Dashboard;
pub use error::SourceNotice;
pub use fallback::{DataOrigin, Resolved};
pub use mock::MockSets;
pub use view::{HashtagReport, LiveTrendsReport, OverviewReport, View, ViewState};
