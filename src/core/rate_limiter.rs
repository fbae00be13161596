//! Sliding-window request limiter consulted before every tool call.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use super::error::{Error, Result};

/// Counts accepted requests inside a trailing time window.
///
/// The check and the record happen under one lock, so interleaved tool calls
/// can never both take the last free slot.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per `window`.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Limiter with a one minute window, the unit upstream quotas are quoted in.
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admit and record a request now, or deny it.
    pub fn can_make_request(&self) -> bool {
        self.can_make_request_at(Instant::now())
    }

    /// Admit and record a request at `now`, or deny it.
    pub fn can_make_request_at(&self, now: Instant) -> bool {
        let mut requests = self.lock();

        while let Some(oldest) = requests.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                requests.pop_front();
            } else {
                break;
            }
        }

        if requests.len() < self.max_requests {
            requests.push_back(now);
            true
        } else {
            false
        }
    }

    /// Time until the oldest recorded request leaves the window.
    pub fn wait_time(&self) -> Duration {
        self.wait_time_at(Instant::now())
    }

    pub fn wait_time_at(&self, now: Instant) -> Duration {
        let requests = self.lock();
        match requests.iter().min() {
            Some(oldest) => self
                .window
                .saturating_sub(now.saturating_duration_since(*oldest)),
            None => Duration::ZERO,
        }
    }

    /// Admit a request or fail with the suggested wait time.
    pub fn check(&self) -> Result<()> {
        if self.can_make_request() {
            Ok(())
        } else {
            let wait = self.wait_time();
            debug!("Rate limiter denied request, wait {:?}", wait);
            Err(Error::RateLimited { wait })
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Instant>> {
        // A poisoned window only means a panic elsewhere; the timestamps are still valid.
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
