//! Vector index
//!
//! SQLite-backed storage of (id, vector, payload) points with filtered
//! nearest-neighbor search. Embeddings are stored as BLOBs and cosine
//! similarity is computed in Rust.

mod predicate;
mod store;

pub use predicate::{Field, Predicate};
pub use store::{
    bytes_to_embedding, cosine_similarity, embedding_to_bytes, IndexStats, ModelInfo, VectorIndex,
};

use std::path::PathBuf;

impl VectorIndex {
    /// Get the default index path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CACHE_DIR_NAME)
            .join("index.sqlite")
    }
}
