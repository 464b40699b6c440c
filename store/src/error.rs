use prefs_types::PrefKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("preference '{key}' holds a {found} value, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: PrefKind,
        found: PrefKind,
    },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store is corrupted: {0}")]
    Corruption(String),
}
