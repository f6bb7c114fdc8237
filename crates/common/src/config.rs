use crate::error::DocSearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Embedding backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server
    Ollama,
    /// Google Gemini embedding API
    Gemini,
}

impl ProviderKind {
    /// Default embedding model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Ollama => "nomic-embed-text",
            Self::Gemini => "models/embedding-001",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = DocSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" | "local" => Ok(Self::Ollama),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(DocSearchError::config(format!(
                "Unknown embedding provider '{}' (expected ollama or gemini)",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// docsearch application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Active embedding provider
    pub embedding_provider: ProviderKind,

    /// Embedding model name
    pub embedding_model: String,

    /// Embedding dimension, fixed for the process lifetime
    pub embedding_dim: usize,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Gemini API base URL
    pub gemini_base_url: String,

    /// Gemini API key
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,

    /// Texts per embedding request
    pub embed_batch_size: usize,

    /// Pause between embedding batches in milliseconds
    pub embed_batch_delay_ms: u64,

    /// Words per chunk
    pub chunk_size: usize,

    /// Words shared between neighbouring chunks
    pub chunk_overlap: usize,

    /// Default number of search results
    pub default_top_k: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8001,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
            embedding_provider: ProviderKind::Ollama,
            embedding_model: ProviderKind::Ollama.default_model().to_string(),
            embedding_dim: 768,
            ollama_base_url: "http://localhost:11434".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_api_key: None,
            embed_batch_size: 100,
            embed_batch_delay_ms: 0,
            chunk_size: 1000,
            chunk_overlap: 200,
            default_top_k: 5,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, DocSearchError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let embedding_provider = match std::env::var("EMBEDDING_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.embedding_provider,
        };

        let config = Self {
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT")?.unwrap_or(defaults.server_port),
            log_dir: std::env::var("LOG_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            embedding_provider,
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| embedding_provider.default_model().to_string()),
            embedding_dim: Self::get_env_parsed("EMBEDDING_DIM")?
                .unwrap_or(defaults.embedding_dim),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or(defaults.ollama_base_url),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or(defaults.gemini_base_url),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            embed_batch_size: Self::get_env_parsed("EMBED_BATCH_SIZE")?
                .unwrap_or(defaults.embed_batch_size),
            embed_batch_delay_ms: Self::get_env_parsed("EMBED_BATCH_DELAY_MS")?
                .unwrap_or(defaults.embed_batch_delay_ms),
            chunk_size: Self::get_env_parsed("CHUNK_SIZE")?.unwrap_or(defaults.chunk_size),
            chunk_overlap: Self::get_env_parsed("CHUNK_OVERLAP")?
                .unwrap_or(defaults.chunk_overlap),
            default_top_k: Self::get_env_parsed("DEFAULT_TOP_K")?
                .unwrap_or(defaults.default_top_k),
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse an optional environment variable, rejecting malformed values
    fn get_env_parsed<T: FromStr>(key: &str) -> Result<Option<T>, DocSearchError> {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
                DocSearchError::config(format!("Invalid value for {}: '{}'", key, raw))
            }),
            Err(_) => Ok(None),
        }
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DocSearchError> {
        if self.server_port == 0 {
            return Err(DocSearchError::config("Server port cannot be 0"));
        }

        if self.embedding_dim == 0 {
            return Err(DocSearchError::config("Embedding dimension must be positive"));
        }

        if self.embedding_model.trim().is_empty() {
            return Err(DocSearchError::config("Embedding model name cannot be empty"));
        }

        if self.embed_batch_size == 0 {
            return Err(DocSearchError::config("Embedding batch size must be positive"));
        }

        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(DocSearchError::config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        let base_url = match self.embedding_provider {
            ProviderKind::Ollama => &self.ollama_base_url,
            ProviderKind::Gemini => &self.gemini_base_url,
        };
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DocSearchError::config(format!(
                "{} base URL must start with http:// or https://",
                self.embedding_provider
            )));
        }

        if self.embedding_provider == ProviderKind::Gemini && self.gemini_api_key.is_none() {
            return Err(DocSearchError::config(
                "GEMINI_API_KEY is required when EMBEDDING_PROVIDER=gemini",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.embedding_dim, 768);
        assert_eq!(config.embedding_provider, ProviderKind::Ollama);
        assert_eq!(config.default_top_k, 5);
    }

    #[test]
    fn test_server_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_bind_address(), "0.0.0.0:8001");
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.embedding_dim = 0;
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.chunk_overlap = invalid_config.chunk_size;
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.ollama_base_url = "localhost:11434".to_string();
        assert!(invalid_config.validate().is_err());
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let mut config = AppConfig::default();
        config.embedding_provider = ProviderKind::Gemini;
        config.embedding_model = ProviderKind::Gemini.default_model().to_string();
        assert!(config.validate().is_err());

        config.gemini_api_key = Some("key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("local".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert!("openai".parse::<ProviderKind>().is_err());
    }
}
