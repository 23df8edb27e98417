//! Polling cache: an explicit registry of per-source slots.
//!
//! A slot exists only while a view observes its source. Each slot walks
//! `idle → pending → {success, error}` and goes back to `pending` when its
//! refetch interval elapses, when a view starts observing stale data, or on
//! a manual refresh. Every issued fetch gets a sequence number from a
//! cache-wide counter; a completion is applied only if it carries the
//! slot's latest number, so superseded responses are dropped, never merged.
//!
//! The slot map is the only shared mutable state. It is locked briefly and
//! never across an `.await`. A fetch dropped mid-flight puts its slot back
//! to the last terminal state, so cancellation never wedges a source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio::time::Instant;
use trendpulse_core::{AppConfig, SourceKey};
use trendpulse_gateway::{FetchError, SourceGateway, SourcePayload};

use crate::retry::retry_with_backoff;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Scheduling rules for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Data younger than this is served without refetching on observe.
    pub stale_time: Duration,
    /// Fixed re-poll period; `None` means manual refresh only.
    pub refetch_interval: Option<Duration>,
    /// Additional attempts after a failed fetch before the slot errors.
    pub retry_budget: u32,
    pub retry_delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(60),
            refetch_interval: None,
            retry_budget: 1,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl PollPolicy {
    /// Live trend and social sources re-poll on the configured interval;
    /// every source gets the configured staleness window and one retry.
    #[must_use]
    pub fn for_source(key: SourceKey, config: &AppConfig) -> Self {
        Self {
            stale_time: config.stale_time(),
            refetch_interval: key.is_live().then(|| config.live_refetch_interval()),
            retry_budget: 1,
            retry_delay: config.retry_delay(),
        }
    }
}

/// Read-only view of a slot.
///
/// `data` is the last successful payload and survives later failures and
/// pending refetches; `error` is set only while the slot is in error.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    pub status: FetchStatus,
    pub data: Option<Arc<SourcePayload>>,
    pub error: Option<Arc<FetchError>>,
    /// The slot has reached `success` or `error` at least once.
    pub settled: bool,
    pub data_updated_at: Option<Instant>,
}

/// What happened to one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was written to the slot, leaving it in this status.
    Applied(FetchStatus),
    /// A newer fetch was issued meanwhile; the result was discarded.
    Superseded,
    /// The source is no longer observed; nothing was fetched or stored.
    Detached,
    /// No fetch was needed (fresh data, or a fetch already in flight).
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Manual,
    Interval,
    Observe,
}

#[derive(Debug)]
struct Slot {
    policy: PollPolicy,
    snapshot: SourceSnapshot,
    settled_at: Option<Instant>,
    latest_seq: u64,
}

impl Slot {
    fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            snapshot: SourceSnapshot::default(),
            settled_at: None,
            latest_seq: 0,
        }
    }

    fn is_due(&self, now: Instant) -> bool {
        match self.snapshot.status {
            FetchStatus::Idle => true,
            FetchStatus::Pending => false,
            FetchStatus::Success | FetchStatus::Error => {
                match (self.policy.refetch_interval, self.settled_at) {
                    (Some(interval), Some(at)) => now.saturating_duration_since(at) >= interval,
                    _ => false,
                }
            }
        }
    }

    fn needs_fetch(&self, now: Instant) -> bool {
        match self.snapshot.status {
            FetchStatus::Idle | FetchStatus::Error => true,
            FetchStatus::Pending => false,
            FetchStatus::Success => self
                .snapshot
                .data_updated_at
                .is_none_or(|at| now.saturating_duration_since(at) >= self.policy.stale_time),
        }
    }
}

pub struct PollingCache<G> {
    gateway: G,
    policies: HashMap<SourceKey, PollPolicy>,
    slots: Mutex<HashMap<SourceKey, Slot>>,
    next_seq: AtomicU64,
}

impl<G: SourceGateway> PollingCache<G> {
    #[must_use]
    pub fn new(gateway: G, policies: HashMap<SourceKey, PollPolicy>) -> Self {
        Self {
            gateway,
            policies,
            slots: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn from_config(gateway: G, config: &AppConfig) -> Self {
        let policies = SourceKey::ALL
            .into_iter()
            .map(|key| (key, PollPolicy::for_source(key, config)))
            .collect();
        Self::new(gateway, policies)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Registers idle slots for `keys`. Already-observed sources keep their
    /// state.
    pub fn observe(&self, keys: &[SourceKey]) {
        let mut slots = self.slots();
        for key in keys {
            slots.entry(*key).or_insert_with(|| {
                tracing::debug!(source = %key, "observing source");
                Slot::new(self.policies.get(key).cloned().unwrap_or_default())
            });
        }
    }

    /// Drops every slot. Fetches still in flight complete as
    /// [`FetchOutcome::Detached`] and are ignored.
    pub fn teardown(&self) {
        let mut slots = self.slots();
        tracing::info!(sources = slots.len(), "tearing down polling cache");
        slots.clear();
    }

    #[must_use]
    pub fn is_observing(&self, key: SourceKey) -> bool {
        self.slots().contains_key(&key)
    }

    /// Current state of `key`; an unobserved source reads as idle.
    #[must_use]
    pub fn snapshot(&self, key: SourceKey) -> SourceSnapshot {
        self.slots()
            .get(&key)
            .map(|slot| slot.snapshot.clone())
            .unwrap_or_default()
    }

    /// `true` when the slot is idle, or settled and its refetch interval has
    /// elapsed. Never `true` while a fetch is pending.
    #[must_use]
    pub fn is_due(&self, key: SourceKey, now: Instant) -> bool {
        self.slots().get(&key).is_some_and(|slot| slot.is_due(now))
    }

    #[must_use]
    pub fn due_sources(&self, now: Instant) -> Vec<SourceKey> {
        let mut due: Vec<SourceKey> = self
            .slots()
            .iter()
            .filter(|(_, slot)| slot.is_due(now))
            .map(|(key, _)| *key)
            .collect();
        due.sort_unstable();
        due
    }

    /// Sources among `keys` not currently in a terminal state: unobserved,
    /// idle, or pending. A refetch over retained data counts as pending.
    #[must_use]
    pub fn not_terminal(&self, keys: &[SourceKey]) -> Vec<SourceKey> {
        let slots = self.slots();
        keys.iter()
            .copied()
            .filter(|key| {
                !slots.get(key).is_some_and(|slot| {
                    matches!(
                        slot.snapshot.status,
                        FetchStatus::Success | FetchStatus::Error
                    )
                })
            })
            .collect()
    }

    /// Issues a fetch unconditionally, superseding any fetch in flight.
    pub async fn refresh(&self, key: SourceKey) -> FetchOutcome {
        self.run_fetch(key, Trigger::Manual, Instant::now()).await
    }

    /// Fetches `key` if it is idle, errored, or its data is stale.
    pub async fn ensure_fresh(&self, key: SourceKey, now: Instant) -> FetchOutcome {
        self.run_fetch(key, Trigger::Observe, now).await
    }

    /// Runs [`Self::ensure_fresh`] for every key concurrently.
    pub async fn ensure_fresh_all(
        &self,
        keys: &[SourceKey],
        now: Instant,
    ) -> Vec<(SourceKey, FetchOutcome)> {
        let fetches = keys.iter().map(|key| async move {
            let outcome = self.ensure_fresh(*key, now).await;
            (*key, outcome)
        });
        join_all(fetches).await
    }

    /// Fetches every source whose refetch interval has elapsed, concurrently.
    /// Completions may land in any order.
    pub async fn poll_due(&self, now: Instant) -> Vec<(SourceKey, FetchOutcome)> {
        let due = self.due_sources(now);
        let fetches = due.into_iter().map(|key| async move {
            let outcome = self.run_fetch(key, Trigger::Interval, now).await;
            (key, outcome)
        });
        join_all(fetches).await
    }

    async fn run_fetch(&self, key: SourceKey, trigger: Trigger, now: Instant) -> FetchOutcome {
        let Some((seq, policy)) = self.try_begin(key, trigger, now) else {
            return if self.is_observing(key) {
                FetchOutcome::Skipped
            } else {
                FetchOutcome::Detached
            };
        };
        let mut guard = PendingGuard {
            cache: self,
            key,
            seq,
            armed: true,
        };
        let result = retry_with_backoff(policy.retry_budget, policy.retry_delay, || {
            self.gateway.fetch(key)
        })
        .await;
        guard.armed = false;
        self.complete(key, seq, result, Instant::now())
    }

    /// Checks the trigger condition and marks the slot pending in one
    /// critical section, so two callers cannot both start an automatic fetch.
    fn try_begin(
        &self,
        key: SourceKey,
        trigger: Trigger,
        now: Instant,
    ) -> Option<(u64, PollPolicy)> {
        let mut slots = self.slots();
        let slot = slots.get_mut(&key)?;
        let go = match trigger {
            Trigger::Manual => true,
            Trigger::Interval => slot.is_due(now),
            Trigger::Observe => slot.needs_fetch(now),
        };
        if !go {
            return None;
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        slot.latest_seq = seq;
        slot.snapshot.status = FetchStatus::Pending;
        tracing::debug!(source = %key, seq, ?trigger, "fetch issued");
        Some((seq, slot.policy.clone()))
    }

    pub(crate) fn complete(
        &self,
        key: SourceKey,
        seq: u64,
        result: Result<SourcePayload, FetchError>,
        now: Instant,
    ) -> FetchOutcome {
        let mut slots = self.slots();
        let Some(slot) = slots.get_mut(&key) else {
            tracing::debug!(source = %key, seq, "result arrived after teardown, ignoring");
            return FetchOutcome::Detached;
        };
        if seq != slot.latest_seq {
            tracing::debug!(
                source = %key,
                seq,
                latest = slot.latest_seq,
                "discarding superseded response"
            );
            return FetchOutcome::Superseded;
        }

        slot.settled_at = Some(now);
        slot.snapshot.settled = true;
        match result {
            Ok(payload) => {
                slot.snapshot.status = FetchStatus::Success;
                slot.snapshot.data = Some(Arc::new(payload));
                slot.snapshot.error = None;
                slot.snapshot.data_updated_at = Some(now);
            }
            Err(err) => {
                tracing::warn!(source = %key, error = %err, "source fetch failed after retries");
                slot.snapshot.status = FetchStatus::Error;
                slot.snapshot.error = Some(Arc::new(err));
            }
        }
        FetchOutcome::Applied(slot.snapshot.status)
    }

    #[cfg(test)]
    pub(crate) fn begin_manual(&self, key: SourceKey) -> Option<u64> {
        self.try_begin(key, Trigger::Manual, Instant::now())
            .map(|(seq, _)| seq)
    }
}

impl<G> PollingCache<G> {
    fn slots(&self) -> MutexGuard<'_, HashMap<SourceKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a slot left pending by an abandoned fetch to the state it had
    /// before that fetch was issued. No-op once a newer fetch owns the slot.
    fn abandon(&self, key: SourceKey, seq: u64) {
        let mut slots = self.slots();
        let Some(slot) = slots.get_mut(&key) else {
            return;
        };
        if slot.latest_seq != seq || slot.snapshot.status != FetchStatus::Pending {
            return;
        }
        slot.snapshot.status = if slot.snapshot.error.is_some() {
            FetchStatus::Error
        } else if slot.snapshot.settled {
            FetchStatus::Success
        } else {
            FetchStatus::Idle
        };
        tracing::debug!(
            source = %key,
            seq,
            status = ?slot.snapshot.status,
            "fetch dropped before completion, slot restored"
        );
    }
}

/// Held across a fetch's `.await`. If the fetch future is dropped first
/// (a cancelled `select!` branch, a timeout), the slot would otherwise stay
/// pending and never be due again.
struct PendingGuard<'a, G> {
    cache: &'a PollingCache<G>,
    key: SourceKey,
    seq: u64,
    armed: bool,
}

impl<G> Drop for PendingGuard<'_, G> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.abandon(self.key, self.seq);
        }
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
