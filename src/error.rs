use thiserror::Error;

/// Failures of key-based lookups. Neither one alters the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AvlError {
    /// The probed key is not in the tree.
    #[error("key not found")]
    NotFound,
    /// The key is already stored and the tree rejects duplicates.
    #[error("key already present")]
    DuplicateKey,
}

pub type Result<T, E = AvlError> = std::result::Result<T, E>;
