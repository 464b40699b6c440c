//! Store-from-configuration entry points.

use prefs_store::PreferenceStore;
use prefs_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment, LmdbPreferenceStore};
use prefs_types::{LegacyVersionCode, PrefValue};
use prefs_upgrade::{PreferenceUpgradeService, UpgradeStatus};

use crate::{HostConfig, HostError};

/// An opened preference store plus the built-in upgrade service.
pub struct PreferenceHost {
    env: LmdbEnvironment,
    store: LmdbPreferenceStore,
    service: PreferenceUpgradeService,
}

impl PreferenceHost {
    /// Open the store described by `config`.
    ///
    /// Refuses to open a data directory that looks damaged or that holds
    /// entries which cannot be decoded.
    pub fn open(config: &HostConfig) -> Result<Self, HostError> {
        config.validate()?;
        check_data_dir(&config.data_dir).map_err(HostError::Corruption)?;

        let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)?;
        let report = check_integrity(&env)?;
        if let Some(first) = report.errors.first() {
            return Err(HostError::Corruption(format!(
                "{} bad entries, first: {}",
                report.errors.len(),
                first
            )));
        }
        tracing::info!(
            data_dir = %config.data_dir.display(),
            entries = report.total_entries,
            "opened preference store"
        );

        let store = env.preference_store();
        Ok(Self {
            env,
            store,
            service: PreferenceUpgradeService::builtin(),
        })
    }

    pub fn store(&self) -> &LmdbPreferenceStore {
        &self.store
    }

    /// Run pending upgrades. Returns whether any were pending.
    pub fn upgrade_preferences(
        &self,
        legacy_previous_version_code: LegacyVersionCode,
    ) -> Result<bool, HostError> {
        let changed = prefs_upgrade::upgrade_preferences(&self.store, legacy_previous_version_code)?;
        self.env.sync()?;
        Ok(changed)
    }

    /// Stamp the store as fully upgraded (fresh install).
    pub fn mark_preferences_up_to_date(&self) -> Result<(), HostError> {
        prefs_upgrade::mark_preferences_up_to_date(&self.store)?;
        self.env.sync()?;
        Ok(())
    }

    pub fn status(&self) -> Result<UpgradeStatus, HostError> {
        Ok(self.service.status(&self.store)?)
    }

    pub fn get(&self, key: &str) -> Result<Option<PrefValue>, HostError> {
        Ok(self.store.get(key)?)
    }

    pub fn set(&self, key: &str, value: PrefValue) -> Result<(), HostError> {
        self.store.put(key, value)?;
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<(String, PrefValue)>, HostError> {
        Ok(self.store.entries()?)
    }
}
