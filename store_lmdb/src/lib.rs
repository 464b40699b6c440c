//! LMDB storage backend for preferences.
//!
//! Implements [`prefs_store::PreferenceStore`] using the `heed` LMDB bindings.
//! All preferences live in a single named database within one environment.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod preferences;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use preferences::LmdbPreferenceStore;
