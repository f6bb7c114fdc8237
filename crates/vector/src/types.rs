use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one indexed chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Chunk text
    pub content: String,

    /// Source label (usually the uploaded filename)
    pub source_label: String,

    /// Timestamp when indexed
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(
        content: impl Into<String>,
        source_label: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            source_label: source_label.into(),
            created_at,
        }
    }
}

/// Raw index hit; `position` is `None` for padding past the stored vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub position: Option<usize>,
    pub score: f32,
}

impl Hit {
    pub fn new(position: usize, score: f32) -> Self {
        Self {
            position: Some(position),
            score,
        }
    }

    /// "No match" padding entry
    pub fn sentinel() -> Self {
        Self {
            position: None,
            score: f32::NEG_INFINITY,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.position.is_none()
    }
}

/// Ranked document result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub content: String,
    pub source_label: String,

    /// Cosine similarity in [-1, 1]
    pub similarity: f32,
}

/// Outcome status of an add call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddStatus {
    Ok,
    Skipped,
}

/// Result of adding a batch of chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    pub status: AddStatus,
    pub chunks_added: usize,
}

impl AddOutcome {
    pub fn added(chunks_added: usize) -> Self {
        Self {
            status: AddStatus::Ok,
            chunks_added,
        }
    }

    pub fn skipped() -> Self {
        Self {
            status: AddStatus::Skipped,
            chunks_added: 0,
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub documents: usize,
    pub dimension: usize,
    pub provider: String,
}
