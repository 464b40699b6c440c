//! Fundamental types for the preference upgrade engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! upgrade version identifiers, legacy build numbers, and typed preference values.

pub mod value;
pub mod version;

pub use value::{PrefKind, PrefValue};
pub use version::{LegacyVersionCode, UpgradeVersion};
