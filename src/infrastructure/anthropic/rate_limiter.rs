//! Token bucket rate limiter for outbound API requests.

use std::time::Instant;

use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket limiter enforcing a sustained requests-per-second rate.
///
/// Capacity equals the refill rate, allowing a one-second burst. Tokens
/// refill continuously based on elapsed time; `acquire` waits until a full
/// token is available and then consumes it.
pub struct TokenBucketRateLimiter {
    bucket: Mutex<Bucket>,
    capacity: f64,
    refill_rate: f64,
}

impl TokenBucketRateLimiter {
    /// Create a limiter allowing `requests_per_second` sustained requests.
    pub fn new(requests_per_second: f64) -> Self {
        assert!(requests_per_second > 0.0, "rate limit must be positive");

        Self {
            bucket: Mutex::new(Bucket {
                tokens: requests_per_second,
                last_refill: Instant::now(),
            }),
            capacity: requests_per_second,
            refill_rate: requests_per_second,
        }
    }

    /// Acquire one token, waiting as long as necessary.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let elapsed = bucket.last_refill.elapsed().as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.capacity);
                bucket.last_refill = Instant::now();

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                // Time until one full token accrues
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.refill_rate)
            };

            sleep(wait).await;
        }
    }
}
