use async_trait::async_trait;
use docsearch_common::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Common trait for embedding backends
///
/// Implementations own any batching, pacing and retry policy. Callers only see
/// fully resolved vectors or a provider error.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a non-empty batch of texts, preserving order and count
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query text
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimension this provider was configured with
    fn dimension(&self) -> usize;

    /// Short provider name for logs and stats
    fn name(&self) -> &str;

    /// Test connection/availability
    async fn test_connection(&self) -> Result<bool>;
}

/// Batch size and pacing applied by remote providers
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Texts per request
    pub size: usize,

    /// Pause between consecutive requests
    pub delay: Duration,

    /// Attempts per request before giving up
    pub max_retries: u32,
}

impl BatchOptions {
    pub fn new(size: usize, delay: Duration) -> Self {
        Self {
            size: size.max(1),
            delay,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Sleep between batches when a delay is configured
    pub(crate) async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            size: 100,
            delay: Duration::ZERO,
            max_retries: 3,
        }
    }
}

/// Run `op` up to `max_retries` times with exponential backoff (1s, 2s, 4s, ...)
pub(crate) async fn with_retry<T, F, Fut>(label: &str, max_retries: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_retries = max_retries.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_retries => {
                let delay = Duration::from_secs(2u64.pow(attempt - 1));
                warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}...",
                    label, attempt, max_retries, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
