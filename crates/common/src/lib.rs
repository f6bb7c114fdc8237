pub mod config;
pub mod error;
pub mod logger;

// Re-export commonly used types
pub use config::{AppConfig, ProviderKind};
pub use error::DocSearchError;
pub type Result<T> = std::result::Result<T, DocSearchError>;
