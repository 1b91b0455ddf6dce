//! Persisted project library.
//!
//! The library is an ordered list of [`p2f_core::project::Project`]s
//! stored as one JSON array under a single key of a [`kv::KvStore`].
//! Every mutation rewrites the whole entry.

pub mod export;
pub mod kv;
pub mod reorder;
pub mod store;

pub use store::{ProjectStore, LIBRARY_KEY};

/// Errors from the library layer.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Reading or writing the backing storage failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The library could not be encoded or decoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A storage key contained characters the backend cannot represent.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// A reorder was given a sequence that is not a permutation of the
    /// current library.
    #[error("Reordered sequence is not a permutation of the library ({got} items for {expected})")]
    NotAPermutation { expected: usize, got: usize },
}
