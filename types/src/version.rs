//! Version identifiers.
//!
//! Two unrelated numbering schemes meet here: the small, dense identifiers of
//! the versioned upgrade steps, and the historical application build numbers
//! that predate versioned upgrades.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an upgrade step.
///
/// `0` is reserved and means "no upgrade has ever been applied".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UpgradeVersion(u32);

impl UpgradeVersion {
    /// The version of a store that never received an upgrade.
    pub const NONE: Self = Self(0);

    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Whether this is the reserved "nothing applied" version.
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Decode a version persisted as a store integer.
    ///
    /// Returns `None` for negative values and values wider than 32 bits.
    pub fn from_stored(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }

    /// Encode this version as a store integer.
    pub fn to_stored(&self) -> i64 {
        i64::from(self.0)
    }
}

impl From<u32> for UpgradeVersion {
    fn from(version: u32) -> Self {
        Self(version)
    }
}

impl fmt::Display for UpgradeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// The application build number the host last ran with, as known before
/// versioned upgrades existed (e.g. `20500225`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LegacyVersionCode(i64);

impl LegacyVersionCode {
    /// Placeholder for queries whose result does not depend on the build number.
    pub const IGNORED: Self = Self(0);

    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for LegacyVersionCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

impl fmt::Display for LegacyVersionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
