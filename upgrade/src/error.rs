//! Upgrade engine errors.

use prefs_store::StoreError;
use prefs_types::UpgradeVersion;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("stored upgrade version {0} is not a valid version identifier")]
    InvalidStoredVersion(i64),

    #[error("upgrade step '{description}' uses reserved version 0")]
    ReservedVersion { description: &'static str },

    #[error("upgrade version {0} is registered more than once")]
    DuplicateVersion(UpgradeVersion),

    #[error("upgrade step {version} failed: {source}")]
    Step {
        version: UpgradeVersion,
        #[source]
        source: StoreError,
    },
}
