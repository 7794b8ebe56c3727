//! Fixed pacing between API requests.

use std::time::Duration;

use async_trait::async_trait;

/// Strategy for the unconditional pauses between requests.
///
/// Brickset has no documented rate limit headers, so the ingestion loop
/// simply spaces requests out. Tests swap in a pacer that records the
/// requested pauses instead of sleeping.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Pacer that sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_pacer_sleeps_for_duration() {
        let start = tokio::time::Instant::now();
        TokioPacer.pause(Duration::from_millis(500)).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
