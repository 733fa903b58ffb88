use std::time::Duration;

use async_trait::async_trait;

use crate::{domain::Watermark, Result};

/// Hexagonal port for the homework status API.
///
/// Implementations return the decoded document untouched; shape checks are
/// the validator's job. Transport, HTTP and content failures must already be
/// classified into `Error` variants.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    fn endpoint(&self) -> &str;

    async fn fetch_homeworks(&self, from: Watermark) -> Result<serde_json::Value>;
}

/// Wall clock plus the loop's only suspension point.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Watermark;

    async fn sleep(&self, period: Duration);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Watermark {
        Watermark(chrono::Utc::now().timestamp())
    }

    async fn sleep(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}
