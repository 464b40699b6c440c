//! Upgrade step records.

use std::fmt;

use prefs_store::{PreferenceStore, StoreError};
use prefs_types::{LegacyVersionCode, UpgradeVersion};

/// Body of an upgrade step.
///
/// Receives the legacy build number the step was constructed with; steps
/// that do not care about it ignore the argument.
pub type UpgradeAction = fn(&dyn PreferenceStore, LegacyVersionCode) -> Result<(), StoreError>;

/// When the body of a step runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applicability {
    /// Whenever the step is pending.
    Always,
    /// Only if the host's legacy build number is below the threshold.
    LegacyBefore(LegacyVersionCode),
}

/// One versioned unit of migration logic.
///
/// Steps are plain values, rebuilt on every registry query.
#[derive(Clone)]
pub struct UpgradeStep {
    version: UpgradeVersion,
    description: &'static str,
    applicability: Applicability,
    legacy_previous_version_code: LegacyVersionCode,
    action: UpgradeAction,
}

impl UpgradeStep {
    /// A step whose body always runs when pending.
    pub fn new(version: u32, description: &'static str, action: UpgradeAction) -> Self {
        Self {
            version: UpgradeVersion::new(version),
            description,
            applicability: Applicability::Always,
            legacy_previous_version_code: LegacyVersionCode::IGNORED,
            action,
        }
    }

    /// A step gated on the legacy build number the host last ran with.
    pub fn legacy(
        version: u32,
        description: &'static str,
        legacy_previous_version_code: LegacyVersionCode,
        run_before: LegacyVersionCode,
        action: UpgradeAction,
    ) -> Self {
        Self {
            version: UpgradeVersion::new(version),
            description,
            applicability: Applicability::LegacyBefore(run_before),
            legacy_previous_version_code,
            action,
        }
    }

    pub fn version(&self) -> UpgradeVersion {
        self.version
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn applicability(&self) -> Applicability {
        self.applicability
    }

    pub fn legacy_previous_version_code(&self) -> LegacyVersionCode {
        self.legacy_previous_version_code
    }

    pub fn is_applicable(&self) -> bool {
        match self.applicability {
            Applicability::Always => true,
            Applicability::LegacyBefore(threshold) => self.legacy_previous_version_code < threshold,
        }
    }

    /// Apply the step to `store`.
    ///
    /// Returns whether the body ran. A step that is not applicable is a no-op.
    pub fn upgrade(&self, store: &dyn PreferenceStore) -> Result<bool, StoreError> {
        if !self.is_applicable() {
            return Ok(false);
        }
        (self.action)(store, self.legacy_previous_version_code)?;
        Ok(true)
    }
}

impl fmt::Debug for UpgradeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpgradeStep")
            .field("version", &self.version)
            .field("description", &self.description)
            .field("applicability", &self.applicability)
            .field("legacy_previous_version_code", &self.legacy_previous_version_code)
            .finish()
    }
}
