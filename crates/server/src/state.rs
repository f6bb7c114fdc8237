use docsearch_common::{AppConfig, Result};
use docsearch_embedding::EmbeddingProvider;
use docsearch_vector::SearchEngine;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Search session shared by every worker
    pub engine: Arc<SearchEngine>,
}

impl AppState {
    /// Create new application state around an embedding provider
    pub fn new(config: AppConfig, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let engine = SearchEngine::new(provider)?;

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }
}
