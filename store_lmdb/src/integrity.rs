//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before any upgrade step
//! rewrites preferences.

use std::path::Path;

use prefs_types::PrefValue;

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check that every preference entry has a UTF-8 key and a decodable value.
///
/// Undecodable entries are recorded in the report rather than causing a hard
/// error; only failures to read the database at all are returned as `Err`.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        total_entries: 0,
        errors: Vec::new(),
    };

    let store = env.preference_store();
    let rtxn = env.env().read_txn()?;
    for entry in store.preferences_db.iter(&rtxn)? {
        let (key, val) = entry?;
        report.total_entries += 1;
        let name = match std::str::from_utf8(key) {
            Ok(name) => name,
            Err(_) => {
                report.errors.push(format!("non UTF-8 key {:?}", key));
                continue;
            }
        };
        if let Err(e) = bincode::deserialize::<PrefValue>(val) {
            report
                .errors
                .push(format!("undecodable value for '{}': {}", name, e));
        }
    }

    if !report.is_healthy() {
        tracing::warn!(
            errors = report.errors.len(),
            entries = report.total_entries,
            "preference integrity check found problems"
        );
    }
    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent or empty) directory. Returns an
/// error if the directory holds files but `data.mdb` is missing, which
/// suggests corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(()); // Fresh start
    }
    let is_empty = std::fs::read_dir(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?
        .next()
        .is_none();
    if is_empty {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefs_store::PreferenceStore;

    #[test]
    fn check_data_dir_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_data_dir(&dir.path().join("missing")).is_ok());
        assert!(check_data_dir(dir.path()).is_ok());
    }

    #[test]
    fn check_data_dir_without_data_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stray.txt"), b"x").unwrap();
        assert!(check_data_dir(dir.path()).is_err());
    }

    #[test]
    fn healthy_environment() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).unwrap();
        env.preference_store().set_int("cardZoom", 120).unwrap();
        env.preference_store().set_bool("useBackup", true).unwrap();

        let report = check_integrity(&env).unwrap();
        assert_eq!(report.total_entries, 2);
        assert!(report.is_healthy());
        assert!(check_data_dir(dir.path()).is_ok());
    }

    #[test]
    fn corrupt_value_reported() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).unwrap();
        let store = env.preference_store();
        let mut wtxn = env.env().write_txn().unwrap();
        store
            .preferences_db
            .put(&mut wtxn, b"broken", &[0xFF, 0xFF, 0xFF, 0xFF])
            .unwrap();
        wtxn.commit().unwrap();

        let report = check_integrity(&env).unwrap();
        assert_eq!(report.total_entries, 1);
        assert!(!report.is_healthy());
    }
}
