//! Host integration for the preference upgrade engine.
//!
//! The engine itself only ever sees a store passed to it. This crate is
//! where a store is obtained: it reads [`HostConfig`], opens the LMDB
//! environment named there, checks it, and hands the store to
//! `prefs-upgrade`.

pub mod config;
pub mod error;
pub mod host;
pub mod logging;

pub use config::HostConfig;
pub use error::HostError;
pub use host::PreferenceHost;
pub use logging::{init_logging, LogFormat};
