//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! The preference store is abstracted behind a trait; this crate provides a
//! test-friendly implementation that:
//! - Keeps everything in memory
//! - Can be made to fail on a chosen write, to simulate a crash mid-upgrade
//! - Never touches the filesystem
//!
//! Usage: swap the LMDB store for [`NullPreferenceStore`] in tests.

pub mod store;

pub use store::NullPreferenceStore;
