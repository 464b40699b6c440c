//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::preferences::LmdbPreferenceStore;
use crate::LmdbError;

/// Name of the database holding all preference entries.
pub const PREFERENCES_DB: &str = "preferences";

/// Wraps the LMDB environment and the preference database handle.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    preferences_db: Database<Bytes, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if it does not exist.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per directory by this process;
        // callers must not open the same path twice concurrently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let preferences_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(PREFERENCES_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, max_dbs, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            preferences_db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// A preference store handle backed by this environment.
    pub fn preference_store(&self) -> LmdbPreferenceStore {
        LmdbPreferenceStore {
            env: Arc::clone(&self.env),
            preferences_db: self.preferences_db,
        }
    }

    /// Force a flush of the memory map to disk.
    pub fn sync(&self) -> Result<(), LmdbError> {
        self.env.force_sync()?;
        Ok(())
    }
}
