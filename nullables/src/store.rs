//! Nullable store — thread-safe in-memory preference storage for testing.

use prefs_store::{PreferenceStore, StoreError};
use prefs_types::PrefValue;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory preference store for testing.
///
/// Every mutation (`put`, `remove_key`, `clear_all`) counts as one write.
/// A write can be scheduled to fail, which leaves the map untouched.
pub struct NullPreferenceStore {
    values: Mutex<BTreeMap<String, PrefValue>>,
    writes: Mutex<u64>,
    fail_at_write: Mutex<Option<u64>>,
}

impl NullPreferenceStore {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
            writes: Mutex::new(0),
            fail_at_write: Mutex::new(None),
        }
    }

    /// Create a store pre-populated with `entries`. Seeding is not counted as writes.
    pub fn with_entries<K: Into<String>>(entries: impl IntoIterator<Item = (K, PrefValue)>) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        store
    }

    /// Make the `n`-th write from now (0-based) fail with a backend error.
    ///
    /// Only one write fails; later writes succeed again.
    pub fn fail_nth_write(&self, n: u64) {
        let writes = *self.writes.lock().unwrap();
        *self.fail_at_write.lock().unwrap() = Some(writes + n);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        *self.writes.lock().unwrap()
    }

    /// Snapshot of the current contents.
    pub fn snapshot(&self) -> BTreeMap<String, PrefValue> {
        self.values.lock().unwrap().clone()
    }

    fn write<T>(
        &self,
        op: impl FnOnce(&mut BTreeMap<String, PrefValue>) -> T,
    ) -> Result<T, StoreError> {
        let mut writes = self.writes.lock().unwrap();
        let mut fail_at = self.fail_at_write.lock().unwrap();
        if *fail_at == Some(*writes) {
            *fail_at = None;
            return Err(StoreError::Backend(format!(
                "injected failure at write {}",
                *writes
            )));
        }
        let result = op(&mut self.values.lock().unwrap());
        *writes += 1;
        Ok(result)
    }
}

impl Default for NullPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for NullPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, StoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        self.write(|values| {
            values.insert(key.to_string(), value);
        })
    }

    fn remove_key(&self, key: &str) -> Result<(), StoreError> {
        self.write(|values| {
            values.remove(key);
        })
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        self.write(|values| values.clear())
    }

    fn entries(&self) -> Result<Vec<(String, PrefValue)>, StoreError> {
        Ok(self
            .values
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefs_types::PrefKind;

    #[test]
    fn test_get_with_default() {
        let store = NullPreferenceStore::new();
        assert_eq!(store.get_int("cardZoom", 100).unwrap(), 100);
        assert!(store.get_bool("useBackup", true).unwrap());
        assert_eq!(store.get_string("fullscreenMode", "0").unwrap(), "0");
    }

    #[test]
    fn test_set_get_remove() {
        let store = NullPreferenceStore::new();
        store.set_int("cardZoom", 150).unwrap();
        store.set_bool("useBackup", false).unwrap();
        assert_eq!(store.get_int("cardZoom", 100).unwrap(), 150);
        assert!(!store.get_bool("useBackup", true).unwrap());

        store.remove_key("useBackup").unwrap();
        assert!(!store.contains("useBackup").unwrap());
        // Removing an absent key is fine.
        store.remove_key("useBackup").unwrap();
    }

    #[test]
    fn test_type_mismatch() {
        let store = NullPreferenceStore::new();
        store.set_string("cardZoom", "big").unwrap();
        match store.get_int("cardZoom", 100) {
            Err(StoreError::TypeMismatch { key, expected, found }) => {
                assert_eq!(key, "cardZoom");
                assert_eq!(expected, PrefKind::Int);
                assert_eq!(found, PrefKind::Str);
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_clear_all() {
        let store = NullPreferenceStore::with_entries([
            ("a", PrefValue::Int(1)),
            ("b", PrefValue::Bool(true)),
        ]);
        store.clear_all().unwrap();
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_entries_sorted_by_key() {
        let store = NullPreferenceStore::with_entries([
            ("zeta", PrefValue::Int(1)),
            ("alpha", PrefValue::Int(2)),
        ]);
        let keys: Vec<String> = store.entries().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[test]
    fn test_injected_failure_leaves_store_untouched() {
        let store = NullPreferenceStore::new();
        store.set_int("a", 1).unwrap();
        store.fail_nth_write(1);

        store.set_int("b", 2).unwrap();
        assert!(matches!(store.set_int("c", 3), Err(StoreError::Backend(_))));
        assert!(!store.contains("c").unwrap());

        // Only the scheduled write fails.
        store.set_int("c", 3).unwrap();
        assert_eq!(store.write_count(), 3);
    }
}
