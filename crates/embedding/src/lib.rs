//! docsearch embedding providers
//!
//! Embedding backends (local Ollama, remote Gemini) behind one trait, plus the
//! text preparation used before documents are embedded.

mod chunking;
mod gemini;
mod ollama;
mod provider;
mod types;

pub use chunking::{chunk_text, clean_text, prepare_document};
pub use gemini::GeminiEmbedder;
pub use ollama::OllamaEmbedder;
pub use provider::{BatchOptions, EmbeddingProvider};

use docsearch_common::{AppConfig, DocSearchError, ProviderKind, Result};
use std::sync::Arc;
use std::time::Duration;

/// Build the embedding provider selected by the configuration
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let batch = BatchOptions::new(
        config.embed_batch_size,
        Duration::from_millis(config.embed_batch_delay_ms),
    );

    let provider: Arc<dyn EmbeddingProvider> = match config.embedding_provider {
        ProviderKind::Ollama => Arc::new(OllamaEmbedder::new(
            &config.ollama_base_url,
            &config.embedding_model,
            config.embedding_dim,
            batch,
        )?),
        ProviderKind::Gemini => {
            let api_key = config.gemini_api_key.as_deref().ok_or_else(|| {
                DocSearchError::config("GEMINI_API_KEY is required for the gemini provider")
            })?;
            Arc::new(GeminiEmbedder::new(
                &config.gemini_base_url,
                &config.embedding_model,
                api_key,
                config.embedding_dim,
                batch,
            )?)
        }
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default_provider() {
        let provider = create_provider(&AppConfig::default()).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.dimension(), 768);
    }

    #[test]
    fn test_create_gemini_without_key_fails() {
        let mut config = AppConfig::default();
        config.embedding_provider = ProviderKind::Gemini;
        assert!(create_provider(&config).is_err());

        config.gemini_api_key = Some("key".to_string());
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "gemini");
    }
}
