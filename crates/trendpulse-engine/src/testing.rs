//! In-memory gateway for cache and view tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use trendpulse_core::{Signal, SkuMapping, SocialPost, SourceKey};
use trendpulse_gateway::{FetchError, SocialFeed, SourceGateway, SourcePayload};

struct Scripted {
    delay: Duration,
    result: Result<SourcePayload, FetchError>,
}

/// Replays queued responses per source, in order. A source with nothing
/// queued answers `HTTP 500`.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    responses: Mutex<HashMap<SourceKey, VecDeque<Scripted>>>,
    calls: Mutex<Vec<SourceKey>>,
}

impl ScriptedGateway {
    pub(crate) fn push_ok(&self, key: SourceKey, payload: SourcePayload) -> &Self {
        self.push(key, Duration::ZERO, Ok(payload))
    }

    pub(crate) fn push_err(&self, key: SourceKey, status: u16) -> &Self {
        self.push(key, Duration::ZERO, Err(status_error(status)))
    }

    pub(crate) fn push(
        &self,
        key: SourceKey,
        delay: Duration,
        result: Result<SourcePayload, FetchError>,
    ) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .push_back(Scripted { delay, result });
        self
    }

    pub(crate) fn calls_for(&self, key: SourceKey) -> usize {
        self.calls.lock().unwrap().iter().filter(|k| **k == key).count()
    }
}

impl SourceGateway for ScriptedGateway {
    async fn fetch(&self, key: SourceKey) -> Result<SourcePayload, FetchError> {
        let next = {
            self.calls.lock().unwrap().push(key);
            self.responses
                .lock()
                .unwrap()
                .get_mut(&key)
                .and_then(VecDeque::pop_front)
        };
        match next {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                scripted.result
            }
            None => Err(status_error(500)),
        }
    }
}

pub(crate) fn status_error(status: u16) -> FetchError {
    FetchError::Status {
        status,
        message: format!("HTTP {status}"),
    }
}

pub(crate) fn signal(keyword: &str, source: &str, velocity: f64) -> Signal {
    Signal {
        keyword: keyword.to_string(),
        source: source.to_string(),
        velocity,
        ..Signal::default()
    }
}

pub(crate) fn post(hashtag: &str, mentions: f64, text: &str) -> SocialPost {
    SocialPost {
        hashtag: (!hashtag.is_empty()).then(|| hashtag.to_string()),
        mentions,
        text: text.to_string(),
        source: "TikTok".to_string(),
        ..SocialPost::default()
    }
}

pub(crate) fn sku(sku: &str, score: f64) -> SkuMapping {
    SkuMapping {
        sku: sku.to_string(),
        title: String::new(),
        score,
    }
}

pub(crate) fn social_payload(rows: Vec<SocialPost>) -> SourcePayload {
    SourcePayload::Social(SocialFeed {
        rows,
        top_hashtags: Vec::new(),
    })
}
