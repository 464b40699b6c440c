//! Abstract preference store traits.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! these traits. The upgrade engine depends only on the traits.

pub mod error;
pub mod preferences;

pub use error::StoreError;
pub use preferences::PreferenceStore;
