use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest `top_k` accepted by `/search`
pub const MAX_TOP_K: usize = 1000;

/// Add pre-chunked text
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    /// Text chunks, indexed in order
    #[serde(default)]
    pub chunks: Vec<String>,

    /// Source label for every chunk
    pub filename: String,
}

/// Add a whole document, chunked server-side
#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    /// Extracted document text
    pub text: String,

    /// Source label for every chunk
    pub filename: String,
}

/// Add response
#[derive(Debug, Serialize)]
pub struct AddResponse {
    /// "ok" or "skipped"
    pub status: String,

    /// Number of chunks indexed
    pub chunks_added: usize,
}

/// Search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Search query text
    pub query: String,

    /// Top K results (server default when omitted)
    pub top_k: Option<usize>,
}

/// One search result
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub content: String,
    pub filename: String,
    pub similarity: f32,
}

/// Generic status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Session statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_chunks: usize,
    pub embedding_dim: usize,
    pub provider: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}
