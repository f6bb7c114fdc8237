use async_trait::async_trait;
use docsearch_common::{DocSearchError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::provider::{with_retry, BatchOptions, EmbeddingProvider};
use crate::types::{OllamaEmbedRequest, OllamaEmbedResponse};

/// Local embedding provider backed by an Ollama server
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimension: usize,
    batch: BatchOptions,
    client: Client,
}

impl OllamaEmbedder {
    /// Create new Ollama embedder
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
        batch: BatchOptions,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = model.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DocSearchError::provider(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Ollama embedder initialized: {} (model={}, dim={})",
            base_url, model, dimension
        );

        Ok(Self {
            base_url,
            model,
            dimension,
            batch,
            client,
        })
    }

    /// Embed one batch, retrying transient failures
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.base_url);
        let request = OllamaEmbedRequest {
            model: &self.model,
            input: texts,
        };

        debug!(
            "Sending embed request to Ollama - Model: {}, Inputs: {}",
            self.model,
            texts.len()
        );

        let (url, request) = (&url, &request);
        with_retry("Ollama embedding request", self.batch.max_retries, || {
            self.try_embed(url, request)
        })
        .await
    }

    /// Single attempt to embed a batch
    async fn try_embed(&self, url: &str, request: &OllamaEmbedRequest<'_>) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| DocSearchError::provider(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| DocSearchError::provider(format!("Ollama embedding API error: {}", e)))?;

        let result: OllamaEmbedResponse = response.json().await.map_err(|e| {
            DocSearchError::provider(format!("Failed to parse embedding response: {}", e))
        })?;

        result.into_vectors(request.input.len())
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for (i, batch) in texts.chunks(self.batch.size).enumerate() {
            if i > 0 {
                self.batch.pause().await;
            }
            embeddings.extend(self.embed_batch(batch).await?);
        }

        debug!("Received {} embeddings from Ollama", embeddings.len());
        Ok(embeddings)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        self.embed_batch(&input)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DocSearchError::provider("Ollama returned no embedding for query"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "ollama"
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DocSearchError::network(format!("Failed to connect to Ollama: {}", e)))?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let embedder = OllamaEmbedder::new(
            "http://localhost:11434/",
            "nomic-embed-text",
            768,
            BatchOptions::default(),
        )
        .unwrap();
        assert_eq!(embedder.base_url, "http://localhost:11434");
        assert_eq!(embedder.dimension(), 768);
        assert_eq!(embedder.name(), "ollama");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_provider_error() {
        let embedder = OllamaEmbedder::new(
            "http://127.0.0.1:9",
            "nomic-embed-text",
            768,
            BatchOptions::default().with_max_retries(1),
        )
        .unwrap();

        let err = embedder.embed_one("hello").await.unwrap_err();
        assert!(matches!(err, DocSearchError::Provider(_)));
    }
}
