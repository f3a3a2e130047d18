use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{sleep, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Token bucket for new connections: `fill_rate` tokens per second.
#[derive(Clone)]
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    fill_rate: u32,
    last_refill: Arc<tokio::sync::Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new(fill_rate: u32) -> Self {
        let fill_rate = fill_rate.max(1);
        Self {
            permits: Arc::new(Semaphore::new(fill_rate as usize)),
            fill_rate,
            last_refill: Arc::new(tokio::sync::Mutex::new(Instant::now())),
        }
    }

    pub async fn acquire(&self) {
        loop {
            let until_refill = self.refill().await;
            match self.permits.try_acquire() {
                Ok(permit) => {
                    permit.forget();
                    return;
                }
                Err(_) => sleep(until_refill).await,
            }
        }
    }

    async fn refill(&self) -> Duration {
        let mut guard = self.last_refill.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(*guard);
        if elapsed >= WINDOW {
            let to_add = self
                .fill_rate
                .saturating_sub(self.permits.available_permits() as u32);
            if to_add > 0 {
                self.permits.add_permits(to_add as usize);
            }
            *guard = now;
            return WINDOW;
        }
        WINDOW - elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_is_capped_per_window() {
        let limiter = RateLimiter::new(2);
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() < WINDOW);

        limiter.acquire().await;
        assert!(start.elapsed() >= WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_one_bucket() {
        let limiter = RateLimiter::new(1);
        let other = limiter.clone();
        let start = Instant::now();
        limiter.acquire().await;
        other.acquire().await;
        assert!(start.elapsed() >= WINDOW);
    }
}
