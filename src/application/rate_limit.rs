//! Fixed-window request throttling keyed by caller.
//!
//! Each key gets a window that opens on its first request and lasts
//! `window_ms`. Up to `max_requests` calls are admitted inside it; rejected
//! calls are not counted. Expired entries are dropped lazily by `check` and
//! eagerly by the cleanup sweep.

use crate::domain::entities::rate_limit::{RateLimitDecision, RateLimitEntry};
use crate::domain::ports::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 4,
            window_ms: 60_000,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.window_ms).unwrap_or(i64::MAX))
    }
}

pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<LimiterState>,
}

#[derive(Default)]
struct LimiterState {
    entries: HashMap<String, RateLimitEntry>,
    /// Admitted requests still waiting on their provider call, per key.
    in_flight: HashMap<String, u32>,
}

impl LimiterState {
    fn live_entry(&self, key: &str, now: DateTime<Utc>) -> Option<&RateLimitEntry> {
        self.entries.get(key).filter(|e| !e.is_expired(now))
    }

    fn release(&mut self, key: &str) {
        if let Some(n) = self.in_flight.get_mut(key) {
            *n -= 1;
            if *n == 0 {
                self.in_flight.remove(key);
            }
        }
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: Mutex::new(LimiterState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LimiterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn window_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.config.window())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Admits or rejects one request for `key`, charging it when admitted.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let mut state = self.lock();
        self.charge(&mut state, key, now)
    }

    fn charge(&self, state: &mut LimiterState, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let max = self.config.max_requests;
        let live = state.entries.get_mut(key).filter(|e| !e.is_expired(now));
        let decision = match live {
            Some(entry) if entry.count >= max => RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_time: entry.window_end,
            },
            Some(entry) => {
                entry.count += 1;
                RateLimitDecision {
                    allowed: true,
                    remaining: max - entry.count,
                    reset_time: entry.window_end,
                }
            }
            None if max == 0 => RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_time: self.window_end(now),
            },
            None => {
                let entry = RateLimitEntry::open(self.window_end(now));
                let decision = RateLimitDecision {
                    allowed: true,
                    remaining: max - 1,
                    reset_time: entry.window_end,
                };
                state.entries.insert(key.to_string(), entry);
                decision
            }
        };

        if !decision.allowed {
            tracing::debug!("Rate limit hit for {key}, resets at {}", decision.reset_time);
        }
        decision
    }

    /// What a new request for `key` would be told right now, counting
    /// reserved in-flight requests, without charging the key.
    pub fn peek(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let state = self.lock();
        self.peek_locked(&state, key, now)
    }

    fn peek_locked(&self, state: &LimiterState, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let max = self.config.max_requests;
        let pending = state.in_flight.get(key).copied().unwrap_or(0);
        let (count, reset_time) = match state.live_entry(key, now) {
            Some(entry) => (entry.count, entry.window_end),
            None => (0, self.window_end(now)),
        };
        let used = count.saturating_add(pending);
        RateLimitDecision {
            allowed: used < max,
            remaining: max.saturating_sub(used),
            reset_time,
        }
    }

    /// Holds one slot of `key`'s quota for a request that has not finished
    /// yet. The window entry is untouched until [`Reservation::commit`];
    /// dropping the reservation gives the slot back.
    pub fn reserve(self: &Arc<Self>, key: &str) -> Result<Reservation, RateLimitDecision> {
        let now = self.clock.now();
        let mut state = self.lock();
        let gate = self.peek_locked(&state, key, now);
        if !gate.allowed {
            tracing::debug!("Rate limit hit for {key}, resets at {}", gate.reset_time);
            return Err(gate);
        }
        *state.in_flight.entry(key.to_string()).or_insert(0) += 1;
        Ok(Reservation {
            limiter: Arc::clone(self),
            key: key.to_string(),
            active: true,
        })
    }

    /// Forgets `key`; its next request opens a fresh window.
    pub fn reset(&self, key: &str) {
        self.lock().entries.remove(key);
    }

    /// Drops every entry whose window has passed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|_, e| !e.is_expired(now));
        before - state.entries.len()
    }

    /// Number of tracked keys, expired or not.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Requests currently holding a reservation for `key`.
    pub fn in_flight(&self, key: &str) -> u32 {
        self.lock().in_flight.get(key).copied().unwrap_or(0)
    }

    /// Spawns the periodic sweep on the current tokio runtime.
    ///
    /// The task holds only a weak reference and exits on its own once the
    /// limiter is dropped.
    pub fn start_cleanup(self: &Arc<Self>, every: std::time::Duration) -> CleanupTask {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let limiter: Weak<RateLimiter> = Arc::downgrade(self);

        let every = every.max(std::time::Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            tracing::info!("Rate limit cleanup started (every {}ms)", every.as_millis());
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(limiter) = limiter.upgrade() else { break };
                        let evicted = limiter.sweep();
                        if evicted > 0 {
                            tracing::debug!("Evicted {evicted} expired rate limit entries");
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("Rate limit cleanup stopped");
        });

        CleanupTask {
            shutdown_tx,
            handle: Some(handle),
        }
    }
}

/// A quota slot held while a request is in progress.
pub struct Reservation {
    limiter: Arc<RateLimiter>,
    key: String,
    active: bool,
}

impl Reservation {
    /// Turns the held slot into a charged request.
    pub fn commit(mut self) -> RateLimitDecision {
        self.active = false;
        let now = self.limiter.clock.now();
        let mut state = self.limiter.lock();
        state.release(&self.key);
        self.limiter.charge(&mut state, &self.key, now)
    }
}

impl std::fmt::Debug for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reservation")
            .field("key", &self.key)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if self.active {
            self.limiter.lock().release(&self.key);
        }
    }
}

/// Handle to the background sweep. Stopping (or dropping) it ends the task.
pub struct CleanupTask {
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl CleanupTask {
    /// Signals the task and waits for it to finish.
    pub async fn stop(mut self) {
        self.shutdown_tx.send(true).ok();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Rate limit cleanup task ended abnormally: {e}");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.shutdown_tx.send(true).ok();
    }
}
