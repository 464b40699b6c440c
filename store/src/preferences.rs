//! Preference storage trait.

use prefs_types::{PrefKind, PrefValue};

use crate::StoreError;

/// A persisted mapping from string keys to typed scalar values.
///
/// Every mutation must be durable before the call returns. Implementations
/// use interior synchronisation, so all methods take `&self`.
pub trait PreferenceStore {
    /// Retrieve the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<PrefValue>, StoreError>;

    /// Store a value under `key`, replacing any previous value of any type.
    fn put(&self, key: &str, value: PrefValue) -> Result<(), StoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove_key(&self, key: &str) -> Result<(), StoreError>;

    /// Delete every key.
    fn clear_all(&self) -> Result<(), StoreError>;

    /// All entries, ordered by key.
    fn entries(&self) -> Result<Vec<(String, PrefValue)>, StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Integer under `key`, or `default` when absent.
    fn get_int(&self, key: &str, default: i64) -> Result<i64, StoreError> {
        match self.get(key)? {
            None => Ok(default),
            Some(PrefValue::Int(v)) => Ok(v),
            Some(other) => Err(mismatch(key, PrefKind::Int, &other)),
        }
    }

    /// Boolean under `key`, or `default` when absent.
    fn get_bool(&self, key: &str, default: bool) -> Result<bool, StoreError> {
        match self.get(key)? {
            None => Ok(default),
            Some(PrefValue::Bool(v)) => Ok(v),
            Some(other) => Err(mismatch(key, PrefKind::Bool, &other)),
        }
    }

    /// String under `key`, or `default` when absent.
    fn get_string(&self, key: &str, default: &str) -> Result<String, StoreError> {
        match self.get(key)? {
            None => Ok(default.to_string()),
            Some(PrefValue::Str(v)) => Ok(v),
            Some(other) => Err(mismatch(key, PrefKind::Str, &other)),
        }
    }

    fn set_int(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.put(key, PrefValue::Int(value))
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.put(key, PrefValue::Bool(value))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put(key, PrefValue::Str(value.to_string()))
    }
}

fn mismatch(key: &str, expected: PrefKind, found: &PrefValue) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
