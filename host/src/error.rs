use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] prefs_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] prefs_store_lmdb::LmdbError),

    #[error("upgrade error: {0}")]
    Upgrade(#[from] prefs_upgrade::UpgradeError),

    #[error("preference store is corrupted: {0}")]
    Corruption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
