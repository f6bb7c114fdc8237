use async_trait::async_trait;
use docsearch_common::{DocSearchError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::provider::{with_retry, BatchOptions, EmbeddingProvider};
use crate::types::{
    GeminiBatchEmbedRequest, GeminiBatchEmbedResponse, GeminiContent, GeminiEmbedRequest,
    GeminiEmbedResponse, GeminiTaskType,
};

/// Remote embedding provider backed by the Gemini API
///
/// Documents are embedded with the `RETRIEVAL_DOCUMENT` task type and queries with
/// `RETRIEVAL_QUERY`.
#[derive(Clone)]
pub struct GeminiEmbedder {
    base_url: String,
    model: String,
    api_key: String,
    dimension: usize,
    batch: BatchOptions,
    client: Client,
}

impl std::fmt::Debug for GeminiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEmbedder")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl GeminiEmbedder {
    /// Create new Gemini embedder
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        dimension: usize,
        batch: BatchOptions,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model = qualify_model(&model.into());
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DocSearchError::provider(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Gemini embedder initialized: {} (model={}, dim={})",
            base_url, model, dimension
        );

        Ok(Self {
            base_url,
            model,
            api_key: api_key.into(),
            dimension,
            batch,
            client,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/{}:{}", self.base_url, self.model, method)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = self.endpoint("batchEmbedContents");
        let request = GeminiBatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| GeminiEmbedRequest {
                    model: &self.model,
                    content: GeminiContent::text(text),
                    task_type: GeminiTaskType::RetrievalDocument,
                })
                .collect(),
        };

        debug!(
            "Sending batch embed request to Gemini - Model: {}, Inputs: {}",
            self.model,
            texts.len()
        );

        let (url, request) = (&url, &request);
        with_retry("Gemini batch embedding request", self.batch.max_retries, || async move {
            let response: GeminiBatchEmbedResponse = self.post(url, request).await?;
            response.into_vectors(request.requests.len())
        })
        .await
    }

    /// Single POST attempt returning the decoded body
    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: serde::Serialize + Sync,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| DocSearchError::provider(format!("Failed to send embedding request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DocSearchError::provider(format!(
                "Gemini embedding API error ({}): {}",
                status, detail
            )));
        }

        response.json().await.map_err(|e| {
            DocSearchError::provider(format!("Failed to parse embedding response: {}", e))
        })
    }
}

/// Gemini expects model names of the form `models/<name>`
fn qualify_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for (i, batch) in texts.chunks(self.batch.size).enumerate() {
            if i > 0 {
                self.batch.pause().await;
            }
            embeddings.extend(self.embed_batch(batch).await?);
        }

        debug!("Received {} embeddings from Gemini", embeddings.len());
        Ok(embeddings)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.endpoint("embedContent");
        let request = GeminiEmbedRequest {
            model: &self.model,
            content: GeminiContent::text(text),
            task_type: GeminiTaskType::RetrievalQuery,
        };

        let (url, request) = (&url, &request);
        with_retry("Gemini query embedding request", self.batch.max_retries, || async move {
            let response: GeminiEmbedResponse = self.post(url, request).await?;
            Ok(response.embedding.values)
        })
        .await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "gemini"
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/v1beta/{}", self.base_url, self.model);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| DocSearchError::network(format!("Failed to connect to Gemini: {}", e)))?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_model() {
        assert_eq!(qualify_model("embedding-001"), "models/embedding-001");
        assert_eq!(qualify_model("models/embedding-001"), "models/embedding-001");
    }

    #[test]
    fn test_endpoint_and_debug_hide_key() {
        let embedder = GeminiEmbedder::new(
            "https://generativelanguage.googleapis.com/",
            "embedding-001",
            "secret-key",
            768,
            BatchOptions::default(),
        )
        .unwrap();

        assert_eq!(
            embedder.endpoint("embedContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/embedding-001:embedContent"
        );
        assert!(!format!("{:?}", embedder).contains("secret-key"));
    }
}
