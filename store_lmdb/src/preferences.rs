//! LMDB implementation of PreferenceStore.
//!
//! Values are `bincode`-encoded [`PrefValue`]s keyed by the UTF-8 key bytes.
//! Every mutation is committed in its own write transaction.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use prefs_store::{PreferenceStore, StoreError};
use prefs_types::PrefValue;

use crate::LmdbError;

#[derive(Clone)]
pub struct LmdbPreferenceStore {
    pub(crate) env: Arc<Env>,
    pub(crate) preferences_db: Database<Bytes, Bytes>,
}

fn decode(key: &[u8], bytes: &[u8]) -> Result<PrefValue, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| {
        LmdbError::Serialization(format!(
            "preference '{}': {}",
            String::from_utf8_lossy(key),
            e
        ))
    })
}

impl PreferenceStore for LmdbPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .preferences_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(decode(key.as_bytes(), bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        let bytes = bincode::serialize(&value).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.preferences_db
            .put(&mut wtxn, key.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn remove_key(&self, key: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.preferences_db
            .delete(&mut wtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.preferences_db
            .clear(&mut wtxn)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!("cleared all preferences");
        Ok(())
    }

    fn entries(&self) -> Result<Vec<(String, PrefValue)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.preferences_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut result = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let name = std::str::from_utf8(key).map_err(|_| {
                StoreError::Corruption(format!("non UTF-8 preference key {:?}", key))
            })?;
            result.push((name.to_string(), decode(key, val)?));
        }
        Ok(result)
    }
}
