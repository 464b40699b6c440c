//! Full-screen display mode preference.
//!
//! Older releases stored a single `fullscreenReview` boolean. Current
//! releases store one of three modes as a string under `fullscreenMode`.

use prefs_store::{PreferenceStore, StoreError};

/// Key of the current full-screen mode preference.
pub const PREF_KEY_NAME: &str = "fullscreenMode";

/// Key of the boolean preference it replaced.
pub const LEGACY_PREF_KEY_NAME: &str = "fullscreenReview";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FullScreenMode {
    /// Answer buttons and the app bar stay visible.
    #[default]
    ButtonsAndMenu,
    /// Only the answer buttons stay visible.
    ButtonsOnly,
    /// Nothing but the card.
    FullscreenAllGone,
}

impl FullScreenMode {
    pub const ALL: [Self; 3] = [
        Self::ButtonsAndMenu,
        Self::ButtonsOnly,
        Self::FullscreenAllGone,
    ];

    /// The persisted representation.
    pub fn preference_value(&self) -> &'static str {
        match self {
            Self::ButtonsAndMenu => "0",
            Self::ButtonsOnly => "1",
            Self::FullscreenAllGone => "2",
        }
    }

    pub fn from_preference_value(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.preference_value() == value)
    }

    /// Read the configured mode. Unknown values fall back to the default.
    pub fn from_preferences(store: &dyn PreferenceStore) -> Result<Self, StoreError> {
        let raw = store.get_string(PREF_KEY_NAME, Self::default().preference_value())?;
        Ok(Self::from_preference_value(&raw).unwrap_or_default())
    }

    pub fn is_full_screen(&self) -> bool {
        *self != Self::ButtonsAndMenu
    }
}

/// Convert the legacy boolean into a [`FullScreenMode`].
///
/// Does nothing when the legacy key is absent. The new key is written before
/// the legacy key is removed.
pub fn upgrade_from_legacy_preference(store: &dyn PreferenceStore) -> Result<(), StoreError> {
    if !store.contains(LEGACY_PREF_KEY_NAME)? {
        return Ok(());
    }
    let was_full_screen = store.get_bool(LEGACY_PREF_KEY_NAME, false)?;
    let mode = if was_full_screen {
        FullScreenMode::ButtonsOnly
    } else {
        FullScreenMode::ButtonsAndMenu
    };
    store.set_string(PREF_KEY_NAME, mode.preference_value())?;
    store.remove_key(LEGACY_PREF_KEY_NAME)?;
    tracing::debug!(?mode, "converted legacy full-screen preference");
    Ok(())
}
