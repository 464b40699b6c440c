//! Applies pending upgrade steps to a preference store.
//!
//! The stored version moves forward one step at a time: after each step's
//! body completes, that step's identifier is written to the store before the
//! next step starts. An interrupted run therefore resumes at the first step
//! that was not recorded.
//!
//! The identifier written is the step's own, not the maximum seen so far. If
//! a registry ever lists a lower identifier after a higher one, the stored
//! version ends at the lower one and the higher step runs again next time.

use serde::Serialize;

use prefs_store::PreferenceStore;
use prefs_types::{LegacyVersionCode, UpgradeVersion};

use crate::registry::{latest_of, validate, PreferenceUpgrades, UpgradeRegistry};
use crate::step::UpgradeStep;
use crate::{UpgradeError, PREFERENCE_UPGRADE_VERSION_KEY};

/// Where a store stands relative to a registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpgradeStatus {
    pub current: UpgradeVersion,
    pub latest: UpgradeVersion,
    pub pending: Vec<UpgradeVersion>,
}

impl UpgradeStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Runs the steps of a registry against preference stores.
#[derive(Clone, Debug, Default)]
pub struct PreferenceUpgradeService<R = PreferenceUpgrades> {
    registry: R,
}

impl PreferenceUpgradeService<PreferenceUpgrades> {
    /// A service over the built-in upgrades.
    pub fn builtin() -> Self {
        Self::new(PreferenceUpgrades)
    }
}

impl<R: UpgradeRegistry> PreferenceUpgradeService<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn latest_version(&self) -> UpgradeVersion {
        self.registry.latest_version()
    }

    /// The stored version, or [`UpgradeVersion::NONE`] if none was ever written.
    pub fn current_version(
        &self,
        store: &dyn PreferenceStore,
    ) -> Result<UpgradeVersion, UpgradeError> {
        let raw = store.get_int(PREFERENCE_UPGRADE_VERSION_KEY, 0)?;
        UpgradeVersion::from_stored(raw).ok_or(UpgradeError::InvalidStoredVersion(raw))
    }

    /// Steps with an identifier above the stored version, in registry order.
    pub fn pending_upgrades(
        &self,
        store: &dyn PreferenceStore,
        legacy_previous_version_code: LegacyVersionCode,
    ) -> Result<Vec<UpgradeStep>, UpgradeError> {
        let current = self.current_version(store)?;
        let steps = self.registry.all_steps(legacy_previous_version_code);

        let latest = latest_of(&steps);
        if current > latest {
            tracing::warn!(
                %current,
                %latest,
                "stored preference version is newer than any known upgrade"
            );
        }

        Ok(steps
            .into_iter()
            .filter(|step| step.version() > current)
            .collect())
    }

    /// Apply every pending step in order, recording each one as it completes.
    ///
    /// Returns `true` if any step was pending, whether or not its body changed
    /// anything. If a step fails, the stored version stays at the last step
    /// that completed.
    pub fn apply_upgrades(
        &self,
        store: &dyn PreferenceStore,
        legacy_previous_version_code: LegacyVersionCode,
    ) -> Result<bool, UpgradeError> {
        validate(&self.registry)?;

        let pending = self.pending_upgrades(store, legacy_previous_version_code)?;
        if pending.is_empty() {
            tracing::debug!("preferences are up to date");
            return Ok(false);
        }

        for step in &pending {
            tracing::info!(
                version = %step.version(),
                description = step.description(),
                "applying preference upgrade"
            );
            let ran = step
                .upgrade(store)
                .map_err(|source| UpgradeError::Step {
                    version: step.version(),
                    source,
                })?;
            if !ran {
                tracing::debug!(version = %step.version(), "upgrade not applicable, recording only");
            }
            store.set_int(PREFERENCE_UPGRADE_VERSION_KEY, step.version().to_stored())?;
        }

        tracing::info!(applied = pending.len(), "preference upgrades complete");
        Ok(true)
    }

    /// Record the store as fully upgraded without running any step.
    pub fn mark_up_to_date(&self, store: &dyn PreferenceStore) -> Result<(), UpgradeError> {
        let latest = self.latest_version();
        store.set_int(PREFERENCE_UPGRADE_VERSION_KEY, latest.to_stored())?;
        tracing::info!(version = %latest, "marked preferences up to date");
        Ok(())
    }

    pub fn status(&self, store: &dyn PreferenceStore) -> Result<UpgradeStatus, UpgradeError> {
        let pending = self
            .pending_upgrades(store, LegacyVersionCode::IGNORED)?
            .iter()
            .map(UpgradeStep::version)
            .collect();
        Ok(UpgradeStatus {
            current: self.current_version(store)?,
            latest: self.latest_version(),
            pending,
        })
    }
}
