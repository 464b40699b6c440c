//! Versioned preference upgrade engine.
//!
//! A preference store carries the identifier of the last upgrade step applied
//! to it. On startup the host calls [`upgrade_preferences`], which runs every
//! registered step with a higher identifier, in registration order, recording
//! each as it completes. A fresh install calls [`mark_preferences_up_to_date`]
//! instead, so no step ever runs against it.
//!
//! Steps live in [`registry::PreferenceUpgrades`]. Version 1 is the legacy
//! step, which carries forward the migrations that used to be gated on the
//! application build number.

pub mod error;
pub mod legacy;
pub mod registry;
pub mod runner;
pub mod step;

pub use error::UpgradeError;
pub use registry::{validate, PreferenceUpgrades, UpgradeRegistry};
pub use runner::{PreferenceUpgradeService, UpgradeStatus};
pub use step::{Applicability, UpgradeAction, UpgradeStep};

use prefs_store::PreferenceStore;
use prefs_types::LegacyVersionCode;

/// Store key holding the identifier of the last applied upgrade.
pub const PREFERENCE_UPGRADE_VERSION_KEY: &str = "preferenceUpgradeVersion";

/// Run all pending built-in upgrades. Returns whether any were pending.
pub fn upgrade_preferences(
    store: &dyn PreferenceStore,
    legacy_previous_version_code: LegacyVersionCode,
) -> Result<bool, UpgradeError> {
    PreferenceUpgradeService::builtin().apply_upgrades(store, legacy_previous_version_code)
}

/// Stamp the store as fully upgraded without running any step.
pub fn mark_preferences_up_to_date(store: &dyn PreferenceStore) -> Result<(), UpgradeError> {
    PreferenceUpgradeService::builtin().mark_up_to_date(store)
}
