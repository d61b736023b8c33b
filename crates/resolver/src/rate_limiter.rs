//! Token bucket rate limiter for outbound dispatch.
//!
//! A single actor task owns the bucket. Callers send a permit request over a
//! channel and wait for the reply, so the bucket is only ever mutated by one
//! task and concurrent resolutions cannot race on it. With a capacity of one
//! token the limiter degenerates to a strict minimum-interval gate of
//! `1000 / requests_per_second` milliseconds.

use std::time::Duration;

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::config::RateLimitConfig;

/// Queued permit requests beyond which `acquire` callers wait to enqueue.
const REQUEST_QUEUE_DEPTH: usize = 1024;

/// Absorbs float drift so a bucket refilled to 0.999999... counts as full.
const TOKEN_EPSILON: f64 = 1e-9;

/// Lower bound on a single wait so the task never spins.
const MIN_WAIT: Duration = Duration::from_millis(1);

/// Upper bound on a single wait; the task refills and checks again after it.
const MAX_WAIT: Duration = Duration::from_secs(60);

/// Token bucket owned by the limiter task.
#[derive(Debug)]
struct TokenBucket {
    /// Current number of available tokens.
    tokens: f64,
    /// Last time the bucket was updated.
    last_update: Instant,
    /// Token refill rate (tokens per second).
    rate: f64,
    /// Maximum bucket capacity.
    capacity: f64,
}

impl TokenBucket {
    fn with_config(config: &RateLimitConfig) -> Self {
        let capacity = f64::from(config.burst_limit.max(1));
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: config.requests_per_second,
            capacity,
        }
    }

    /// Refill tokens based on elapsed time.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    /// Try to take a token immediately.
    fn try_acquire(&mut self) -> bool {
        self.refill();

        if self.tokens + TOKEN_EPSILON >= 1.0 {
            self.tokens = (self.tokens - 1.0).max(0.0);
            true
        } else {
            false
        }
    }

    /// Calculate the wait time until a token becomes available.
    fn time_until_available(&mut self) -> Duration {
        self.refill();

        if self.tokens + TOKEN_EPSILON >= 1.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64((1.0 - self.tokens) / self.rate)
                .map_or(MAX_WAIT, |wait| wait.min(MAX_WAIT))
        }
    }
}

/// Handle to the limiter task. Cloning shares the same gate.
#[derive(Clone)]
pub struct RateLimiter {
    requests: mpsc::Sender<oneshot::Sender<()>>,
}

impl RateLimiter {
    /// Spawn the limiter task on the current Tokio runtime.
    ///
    /// The task exits once every handle has been dropped.
    pub fn spawn(config: &RateLimitConfig) -> Self {
        let (requests, rx) = mpsc::channel(REQUEST_QUEUE_DEPTH);
        let bucket = TokenBucket::with_config(config);
        debug!(
            "Rate limiter: {} req/s, burst {}",
            config.requests_per_second, config.burst_limit
        );
        tokio::spawn(run_limiter(rx, bucket));
        Self { requests }
    }

    /// Wait until dispatch is permitted.
    pub async fn acquire(&self) {
        let (reply, permit) = oneshot::channel();

        if self.requests.send(reply).await.is_err() {
            warn!("Rate limiter task is gone, dispatching without a permit");
            return;
        }

        if permit.await.is_err() {
            warn!("Rate limiter task dropped a pending permit");
        }
    }
}

async fn run_limiter(mut rx: mpsc::Receiver<oneshot::Sender<()>>, mut bucket: TokenBucket) {
    while let Some(reply) = rx.recv().await {
        // Callers that gave up while queued must not consume a token.
        if reply.is_closed() {
            continue;
        }

        while !bucket.try_acquire() {
            let wait = bucket.time_until_available().max(MIN_WAIT);
            debug!("Rate limiter: waiting {:?}", wait);
            tokio::time::sleep(wait).await;
            if reply.is_closed() {
                break;
            }
        }

        if !reply.is_closed() {
            let _ = reply.send(());
        }
    }
    debug!("Rate limiter task stopped");
}
