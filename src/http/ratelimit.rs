//! Per-bucket rate limiting for the Discord REST API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;
use reqwest::header::HeaderMap;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Rate limit state Discord reports on every response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateLimitHeaders {
    /// Requests left in the current window.
    pub remaining: Option<u32>,

    /// Seconds until the window resets.
    pub reset_after: Option<f64>,

    /// Unix time (seconds) the window resets.
    pub reset_at: Option<f64>,

    /// Wait requested by a 429 response.
    pub retry_after: Option<f64>,
}

impl RateLimitHeaders {
    pub fn parse(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        };

        let seconds = |name: &str| {
            get(name)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        Self {
            remaining: get("x-ratelimit-remaining").and_then(|v| v.parse().ok()),
            reset_after: seconds("x-ratelimit-reset-after"),
            reset_at: seconds("x-ratelimit-reset"),
            retry_after: seconds("retry-after"),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// How long until the bucket may be used again.
    pub fn reset_delay(&self) -> Duration {
        if let Some(after) = self.reset_after {
            return seconds_to_duration(after);
        }

        match self.reset_at {
            Some(at) => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs_f64())
                    .unwrap_or_default();
                seconds_to_duration((at - now).ceil())
            }
            None => Duration::ZERO,
        }
    }
}

/// Convert a server-provided delay, capped at an hour. NaN and negative
/// values mean no wait.
pub fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_nan() {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds.min(MAX_WAIT_SECS)).unwrap_or_default()
}

const MAX_WAIT_SECS: f64 = 3600.0;

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// One lock per bucket, created the first time the bucket is used and
/// dropped once nobody holds or waits on it.
#[derive(Debug, Default)]
pub struct RateLimiter {
    locks: LockMap,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `bucket`.
    pub async fn acquire(&self, bucket: &str) -> BucketGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            match locks.get(bucket) {
                Some(lock) => Arc::clone(lock),
                None => {
                    debug!("<{bucket}> generating new lock");
                    let lock = Arc::new(AsyncMutex::new(()));
                    locks.insert(bucket.to_string(), Arc::clone(&lock));
                    lock
                }
            }
        };

        let guard = lock.lock_owned().await;
        debug!("<{bucket}> acquired lock");
        BucketGuard {
            bucket: bucket.to_string(),
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Exclusive use of a bucket; released on drop.
#[derive(Debug)]
pub struct BucketGuard {
    bucket: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockMap,
}

impl BucketGuard {
    /// Keep the bucket locked for `delay` without blocking the caller.
    pub fn release_after(self, delay: Duration) {
        if delay.is_zero() {
            return;
        }

        debug!("<{}> releasing lock in {:?}", self.bucket, delay);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            drop(self);
        });
    }
}

impl Drop for BucketGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        // Waiters clone the lock under the map lock, so a count of one
        // here means only the map still refers to it.
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks
            .get(&self.bucket)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.bucket);
            debug!("<{}> dropped idle lock", self.bucket);
        }
    }
}
