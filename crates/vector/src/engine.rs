use chrono::Utc;
use docsearch_common::{DocSearchError, Result};
use docsearch_embedding::EmbeddingProvider;
use ndarray::Array2;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::index::FlatIpIndex;
use crate::normalize::{normalize_rows, normalize_vector, stack_embeddings};
use crate::store::DocumentStore;
use crate::types::{AddOutcome, DocumentRecord, SearchHit, SessionStats};

/// Index and metadata for one session
///
/// Both halves live behind the same lock so row `i` of the index and record `i`
/// of the store are always observed together.
#[derive(Debug)]
struct Session {
    index: FlatIpIndex,
    store: DocumentStore,
}

impl Session {
    fn new(dimension: usize) -> Self {
        Self {
            index: FlatIpIndex::new(dimension),
            store: DocumentStore::new(),
        }
    }

    fn len(&self) -> usize {
        debug_assert_eq!(self.index.len(), self.store.len());
        self.store.len()
    }

    /// Append vectors and records as one step; nothing changes on error
    fn append(&mut self, vectors: &Array2<f32>, records: Vec<DocumentRecord>) -> Result<()> {
        if vectors.nrows() != records.len() {
            return Err(DocSearchError::internal(format!(
                "{} vectors for {} records",
                vectors.nrows(),
                records.len()
            )));
        }
        self.index.add(vectors)?;
        self.store.append(records);
        Ok(())
    }

    fn clear(&mut self) {
        self.index.clear();
        self.store.clear();
    }
}

/// Vector search engine
///
/// Owns the session state for one embedding dimension. Embedding calls are made
/// before the session lock is taken; searches share the lock, adds and clears
/// hold it exclusively.
pub struct SearchEngine {
    session: RwLock<Session>,
    provider: Arc<dyn EmbeddingProvider>,
    dimension: usize,
}

impl SearchEngine {
    /// Create new engine with the provider's output dimension
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let dimension = provider.dimension();
        if dimension == 0 {
            return Err(DocSearchError::config("Embedding dimension must be positive"));
        }

        info!(
            "Search engine initialized - provider={}, dim={}",
            provider.name(),
            dimension
        );

        Ok(Self {
            session: RwLock::new(Session::new(dimension)),
            provider,
            dimension,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Embed and index a batch of chunks under one source label
    pub async fn add_documents(&self, chunks: &[String], source_label: &str) -> Result<AddOutcome> {
        if chunks.is_empty() {
            debug!("No chunks supplied for {}, skipping", source_label);
            return Ok(AddOutcome::skipped());
        }

        let vectors = self.provider.embed_many(chunks).await?;
        if vectors.len() != chunks.len() {
            return Err(DocSearchError::provider(format!(
                "provider returned {} embeddings for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        self.add_embeddings(chunks, source_label, vectors).await
    }

    /// Index chunks whose embeddings were already computed
    pub async fn add_embeddings(
        &self,
        chunks: &[String],
        source_label: &str,
        vectors: Vec<Vec<f32>>,
    ) -> Result<AddOutcome> {
        if chunks.is_empty() {
            return Ok(AddOutcome::skipped());
        }
        if vectors.len() != chunks.len() {
            return Err(DocSearchError::invalid_input(format!(
                "{} embeddings supplied for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let mut matrix = stack_embeddings(vectors, self.dimension)?;
        normalize_rows(&mut matrix);

        let created_at = Utc::now();
        let records = chunks
            .iter()
            .map(|chunk| DocumentRecord::new(chunk.as_str(), source_label, created_at))
            .collect();

        let total = {
            let mut session = self.session.write().await;
            session.append(&matrix, records)?;
            session.len()
        };

        info!(
            "Indexed {} chunks from {} ({} total)",
            chunks.len(),
            source_label,
            total
        );
        Ok(AddOutcome::added(chunks.len()))
    }

    /// Top `top_k` chunks most similar to `query`
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        // Skip the provider call on an empty session. A clear racing in before
        // `search_embedding` re-locks just yields no results.
        if top_k == 0 || self.is_empty().await {
            return Ok(Vec::new());
        }

        let embedding = self.provider.embed_one(query).await?;
        self.search_embedding(embedding, top_k).await
    }

    /// Top `top_k` chunks for an already computed query embedding
    pub async fn search_embedding(&self, mut query: Vec<f32>, top_k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(DocSearchError::dimension_mismatch(self.dimension, query.len()));
        }
        if query.iter().any(|x| !x.is_finite()) {
            return Err(DocSearchError::invalid_input(
                "query embedding contains non-finite values",
            ));
        }
        normalize_vector(&mut query);

        let session = self.session.read().await;
        let k = top_k.min(session.len());
        let hits = session.index.search(&query, k)?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(position) = hit.position else {
                continue;
            };
            let record = session.store.get(position)?;
            results.push(SearchHit {
                content: record.content.clone(),
                source_label: record.source_label.clone(),
                similarity: hit.score.clamp(-1.0, 1.0),
            });
        }

        debug!(
            "Search completed - {} results (from {} candidates)",
            results.len(),
            session.len()
        );
        Ok(results)
    }

    /// Drop every indexed chunk; returns how many were removed
    pub async fn clear_session(&self) -> usize {
        let mut session = self.session.write().await;
        let removed = session.len();
        session.clear();

        info!("Session cleared - {} chunks removed", removed);
        removed
    }

    /// Number of indexed chunks
    pub async fn len(&self) -> usize {
        self.session.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Get session statistics
    pub async fn stats(&self) -> SessionStats {
        SessionStats {
            documents: self.len().await,
            dimension: self.dimension,
            provider: self.provider.name().to_string(),
        }
    }
}
