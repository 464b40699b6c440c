//! The table of all known upgrade steps.

use std::collections::HashSet;

use prefs_types::{LegacyVersionCode, UpgradeVersion};

use crate::legacy::legacy_upgrade_step;
use crate::step::UpgradeStep;
use crate::UpgradeError;

/// Source of the ordered upgrade step sequence.
///
/// Querying twice yields the same steps in the same order. Implemented for
/// any `Fn(LegacyVersionCode) -> Vec<UpgradeStep>`, so ad-hoc tables can be
/// passed as closures.
pub trait UpgradeRegistry {
    /// Every known step, in registration order.
    fn all_steps(&self, legacy_previous_version_code: LegacyVersionCode) -> Vec<UpgradeStep>;

    /// Highest identifier across all steps, or [`UpgradeVersion::NONE`] if there are none.
    fn latest_version(&self) -> UpgradeVersion {
        latest_of(&self.all_steps(LegacyVersionCode::IGNORED))
    }
}

impl<F> UpgradeRegistry for F
where
    F: Fn(LegacyVersionCode) -> Vec<UpgradeStep>,
{
    fn all_steps(&self, legacy_previous_version_code: LegacyVersionCode) -> Vec<UpgradeStep> {
        self(legacy_previous_version_code)
    }
}

/// The built-in upgrades.
///
/// New steps are appended with an identifier one above the last.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreferenceUpgrades;

impl UpgradeRegistry for PreferenceUpgrades {
    fn all_steps(&self, legacy_previous_version_code: LegacyVersionCode) -> Vec<UpgradeStep> {
        vec![legacy_upgrade_step(legacy_previous_version_code)]
    }
}

pub(crate) fn latest_of(steps: &[UpgradeStep]) -> UpgradeVersion {
    steps
        .iter()
        .map(UpgradeStep::version)
        .max()
        .unwrap_or(UpgradeVersion::NONE)
}

/// Check that no step uses the reserved version and no identifier repeats.
///
/// Registration order is not checked.
pub fn validate(registry: &impl UpgradeRegistry) -> Result<(), UpgradeError> {
    let mut seen = HashSet::new();
    for step in registry.all_steps(LegacyVersionCode::IGNORED) {
        if step.version().is_none() {
            return Err(UpgradeError::ReservedVersion {
                description: step.description(),
            });
        }
        if !seen.insert(step.version()) {
            return Err(UpgradeError::DuplicateVersion(step.version()));
        }
    }
    Ok(())
}
