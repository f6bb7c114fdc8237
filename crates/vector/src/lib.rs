//! docsearch vector search engine
//!
//! In-memory exact similarity search over normalized text embeddings, kept in
//! positional lockstep with the chunk metadata.

mod engine;
mod index;
mod normalize;
mod store;
mod types;

pub use engine::SearchEngine;
pub use index::FlatIpIndex;
pub use normalize::{normalize_rows, normalize_vector, stack_embeddings};
pub use store::DocumentStore;
pub use types::{AddOutcome, AddStatus, DocumentRecord, Hit, SearchHit, SessionStats};
