use docsearch_common::{DocSearchError, Result};
use serde::{Deserialize, Serialize};

/// Ollama `/api/embed` request
#[derive(Debug, Clone, Serialize)]
pub struct OllamaEmbedRequest<'a> {
    /// Model name (e.g., "nomic-embed-text")
    pub model: &'a str,

    /// Texts to embed
    pub input: &'a [String],
}

/// Ollama `/api/embed` response
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaEmbedResponse {
    /// One vector per input, in input order
    #[serde(default)]
    pub embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedResponse {
    /// Vectors for a batch of `inputs` texts
    pub fn into_vectors(self, inputs: usize) -> Result<Vec<Vec<f32>>> {
        expect_count("Ollama", self.embeddings, inputs)
    }
}

/// Gemini task type hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeminiTaskType {
    RetrievalDocument,
    RetrievalQuery,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeminiPart<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeminiContent<'a> {
    pub parts: Vec<GeminiPart<'a>>,
}

impl<'a> GeminiContent<'a> {
    pub fn text(text: &'a str) -> Self {
        Self {
            parts: vec![GeminiPart { text }],
        }
    }
}

/// Gemini `:embedContent` request (also one entry of a batch request)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiEmbedRequest<'a> {
    /// Fully qualified model name ("models/...")
    pub model: &'a str,

    pub content: GeminiContent<'a>,

    pub task_type: GeminiTaskType,
}

/// Gemini `:batchEmbedContents` request
#[derive(Debug, Clone, Serialize)]
pub struct GeminiBatchEmbedRequest<'a> {
    pub requests: Vec<GeminiEmbedRequest<'a>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

/// Gemini `:embedContent` response
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiEmbedResponse {
    pub embedding: GeminiEmbedding,
}

/// Gemini `:batchEmbedContents` response
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiBatchEmbedResponse {
    #[serde(default)]
    pub embeddings: Vec<GeminiEmbedding>,
}

impl GeminiBatchEmbedResponse {
    /// Vectors for a batch of `inputs` texts
    pub fn into_vectors(self, inputs: usize) -> Result<Vec<Vec<f32>>> {
        let vectors = self.embeddings.into_iter().map(|e| e.values).collect();
        expect_count("Gemini", vectors, inputs)
    }
}

/// Each batch must yield exactly one vector per input
fn expect_count(provider: &str, vectors: Vec<Vec<f32>>, inputs: usize) -> Result<Vec<Vec<f32>>> {
    if vectors.len() != inputs {
        return Err(DocSearchError::provider(format!(
            "{} returned {} embeddings for {} inputs",
            provider,
            vectors.len(),
            inputs
        )));
    }
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_request_wire_format() {
        let request = GeminiEmbedRequest {
            model: "models/embedding-001",
            content: GeminiContent::text("hello"),
            task_type: GeminiTaskType::RetrievalQuery,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "models/embedding-001");
        assert_eq!(json["taskType"], "RETRIEVAL_QUERY");
        assert_eq!(json["content"]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_ollama_response_parse() {
        let body = r#"{"model":"nomic-embed-text","embeddings":[[0.1,0.2],[0.3,0.4]]}"#;
        let response: OllamaEmbedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.embeddings.len(), 2);
        assert_eq!(response.embeddings[1], vec![0.3, 0.4]);
    }

    #[test]
    fn test_ollama_short_batch_is_rejected() {
        let response = OllamaEmbedResponse {
            embeddings: vec![vec![0.1, 0.2]],
        };
        let err = response.into_vectors(2).unwrap_err();
        assert!(matches!(err, DocSearchError::Provider(_)));
        assert!(err.to_string().contains("returned 1 embeddings for 2 inputs"));
    }

    #[test]
    fn test_ollama_long_batch_is_rejected() {
        let response = OllamaEmbedResponse {
            embeddings: vec![vec![0.1], vec![0.2], vec![0.3]],
        };
        assert!(response.into_vectors(2).is_err());
    }

    #[test]
    fn test_gemini_batch_count_checked() {
        let body = r#"{"embeddings":[{"values":[0.1,0.2]},{"values":[0.3,0.4]}]}"#;
        let response: GeminiBatchEmbedResponse = serde_json::from_str(body).unwrap();
        let vectors = response.clone().into_vectors(2).unwrap();
        assert_eq!(vectors[1], vec![0.3, 0.4]);

        let err = response.into_vectors(3).unwrap_err();
        assert!(matches!(err, DocSearchError::Provider(_)));
    }
}
