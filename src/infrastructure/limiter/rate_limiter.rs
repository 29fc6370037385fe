use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Sliding window approximated from the current and previous fixed windows.
#[derive(Debug)]
struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.current_window_start);
        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
        }
    }

    /// Counts the request if allowed; otherwise returns seconds until retry.
    fn hit(&mut self, now: Instant) -> Result<(), u64> {
        self.roll(now);
        self.last_seen = now;

        let elapsed = now.duration_since(self.current_window_start).as_secs_f64();
        let weight = 1.0 - elapsed / self.window_size.as_secs_f64();
        let effective = self.prev_count as f64 * weight + self.current_count as f64;

        if effective < self.limit as f64 {
            self.current_count += 1;
            return Ok(());
        }

        let window_left = self.window_size.as_secs_f64() - elapsed;
        Err((window_left.ceil() as u64).max(1))
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

/// Per-key request windows shared across workers.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, Arc<Mutex<SlidingWindow>>>>,
    window_size: Duration,
    limit: u64,
}

impl RateLimiterStore {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            window_size,
            limit,
        }
    }

    /// Periodically drops windows that have been idle for two full windows.
    pub fn spawn_eviction(&self) {
        let map = self.map.clone();
        let ttl = self.window_size * 2;
        tokio::spawn(async move {
            loop {
                sleep(EVICTION_INTERVAL).await;
                let now = Instant::now();
                map.retain(|_, window| now.duration_since(window.lock().last_seen) <= ttl);
            }
        });
    }

    fn window(&self, key: &str) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, Instant::now())))
            })
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let window = self.window(key);
        let mut w = window.lock();
        match w.hit(Instant::now()) {
            Ok(()) => RateDecision::Allowed,
            Err(retry_after_secs) => RateDecision::Limited { retry_after_secs },
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }
}
