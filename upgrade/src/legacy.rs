//! Legacy upgrade step (version 1).
//!
//! Before versioned upgrades existed, preferences were migrated by comparing
//! the build number the app last ran with against hard-coded release build
//! numbers. This step folds all of that into version 1. The thresholds are
//! historical release identifiers and must not change.

use prefs_store::{PreferenceStore, StoreError};
use prefs_types::LegacyVersionCode;

use crate::step::UpgradeStep;

pub const LEGACY_UPGRADE_VERSION: u32 = 1;

/// Build number from which preferences no longer needed the legacy checks.
pub const CHECK_PREFERENCES_AT_VERSION: LegacyVersionCode = LegacyVersionCode::new(20500225);

/// Installs older than this are incompatible and get a full reset.
pub const CLEAR_PREFERENCES_BEFORE: LegacyVersionCode = LegacyVersionCode::new(20300130);

/// Installs older than this still use the pre-zoom keys and `useBackup`.
pub const ZOOM_KEYS_BEFORE: LegacyVersionCode = LegacyVersionCode::new(20500135);

pub const RELATIVE_DISPLAY_FONT_SIZE: &str = "relativeDisplayFontSize";
pub const RELATIVE_IMAGE_SIZE: &str = "relativeImageSize";
pub const CARD_ZOOM: &str = "cardZoom";
pub const IMAGE_ZOOM: &str = "imageZoom";
pub const USE_BACKUP: &str = "useBackup";
pub const BACKUP_MAX: &str = "backupMax";
pub const INTENT_ADDITION_INSTANT_ADD: &str = "intentAdditionInstantAdd";

const DEFAULT_ZOOM: i64 = 100;

/// Build the legacy step for a host that last ran `legacy_previous_version_code`.
pub fn legacy_upgrade_step(legacy_previous_version_code: LegacyVersionCode) -> UpgradeStep {
    UpgradeStep::legacy(
        LEGACY_UPGRADE_VERSION,
        "port build-number gated preference upgrades",
        legacy_previous_version_code,
        CHECK_PREFERENCES_AT_VERSION,
        upgrade_old_preferences,
    )
}

fn upgrade_old_preferences(
    store: &dyn PreferenceStore,
    previous: LegacyVersionCode,
) -> Result<(), StoreError> {
    if previous < CLEAR_PREFERENCES_BEFORE {
        tracing::info!(%previous, "legacy install too old, clearing all preferences");
        store.clear_all()?;
    }

    if previous < ZOOM_KEYS_BEFORE {
        let font_size = store.get_int(RELATIVE_DISPLAY_FONT_SIZE, DEFAULT_ZOOM)?;
        let image_size = store.get_int(RELATIVE_IMAGE_SIZE, DEFAULT_ZOOM)?;
        store.set_int(CARD_ZOOM, font_size)?;
        store.set_int(IMAGE_ZOOM, image_size)?;
        if !store.get_bool(USE_BACKUP, true)? {
            store.set_int(BACKUP_MAX, 0)?;
        }
        // Replacements are written, the obsolete keys can go.
        store.remove_key(USE_BACKUP)?;
        store.remove_key(INTENT_ADDITION_INSTANT_ADD)?;
    }

    prefs_display::upgrade_from_legacy_preference(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefs_display::{FullScreenMode, LEGACY_PREF_KEY_NAME};
    use prefs_nullables::NullPreferenceStore;
    use prefs_types::PrefValue;

    fn run(code: i64, store: &NullPreferenceStore) -> bool {
        legacy_upgrade_step(LegacyVersionCode::new(code))
            .upgrade(store)
            .unwrap()
    }

    #[test]
    fn very_old_install_is_cleared() {
        let store = NullPreferenceStore::with_entries([
            ("deckPath", PrefValue::Str("/sdcard".to_string())),
            ("someFlag", PrefValue::Bool(true)),
            (RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(180)),
        ]);
        assert!(run(20300100, &store));

        assert!(!store.contains("deckPath").unwrap());
        assert!(!store.get_bool("someFlag", false).unwrap());
        assert!(!store.contains(RELATIVE_DISPLAY_FONT_SIZE).unwrap());
        // The zoom migration still runs afterwards, on defaults.
        assert_eq!(store.get_int(CARD_ZOOM, -1).unwrap(), 100);
        assert_eq!(store.get_int(IMAGE_ZOOM, -1).unwrap(), 100);
    }

    #[test]
    fn zoom_keys_and_backup_migrated() {
        let store = NullPreferenceStore::with_entries([
            (RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(150)),
            (USE_BACKUP, PrefValue::Bool(false)),
            (INTENT_ADDITION_INSTANT_ADD, PrefValue::Bool(true)),
            ("deckPath", PrefValue::Str("/sdcard".to_string())),
        ]);
        assert!(run(20500100, &store));

        assert_eq!(store.get_int(CARD_ZOOM, -1).unwrap(), 150);
        assert_eq!(store.get_int(IMAGE_ZOOM, -1).unwrap(), 100);
        assert_eq!(store.get_int(BACKUP_MAX, -1).unwrap(), 0);
        assert!(!store.contains(USE_BACKUP).unwrap());
        assert!(!store.contains(INTENT_ADDITION_INSTANT_ADD).unwrap());
        // Not cleared: above the reset threshold.
        assert!(store.contains("deckPath").unwrap());
    }

    #[test]
    fn backup_enabled_does_not_write_backup_max() {
        let store = NullPreferenceStore::with_entries([(USE_BACKUP, PrefValue::Bool(true))]);
        run(20500100, &store);
        assert!(!store.contains(BACKUP_MAX).unwrap());
        assert!(!store.contains(USE_BACKUP).unwrap());
    }

    #[test]
    fn absent_backup_flag_does_not_write_backup_max() {
        let store = NullPreferenceStore::new();
        run(20500100, &store);
        assert!(!store.contains(BACKUP_MAX).unwrap());
    }

    #[test]
    fn between_zoom_and_check_thresholds_only_converts_full_screen() {
        let store = NullPreferenceStore::with_entries([
            (RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(150)),
            (USE_BACKUP, PrefValue::Bool(false)),
            (LEGACY_PREF_KEY_NAME, PrefValue::Bool(true)),
        ]);
        assert!(run(20500200, &store));

        assert!(!store.contains(CARD_ZOOM).unwrap());
        assert!(store.contains(USE_BACKUP).unwrap());
        assert_eq!(
            FullScreenMode::from_preferences(&store).unwrap(),
            FullScreenMode::ButtonsOnly
        );
    }

    #[test]
    fn recent_install_skips_body() {
        let store = NullPreferenceStore::with_entries([
            (RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(150)),
            (USE_BACKUP, PrefValue::Bool(false)),
            (LEGACY_PREF_KEY_NAME, PrefValue::Bool(true)),
        ]);
        let before = store.snapshot();
        assert!(!run(20500300, &store));
        assert!(!run(CHECK_PREFERENCES_AT_VERSION.as_i64(), &store));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn failure_before_removal_keeps_legacy_keys() {
        let store = NullPreferenceStore::with_entries([
            (RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(150)),
            (USE_BACKUP, PrefValue::Bool(false)),
        ]);
        // Writes: cardZoom, imageZoom, backupMax, remove useBackup.
        store.fail_nth_write(2);
        let step = legacy_upgrade_step(LegacyVersionCode::new(20500100));
        assert!(step.upgrade(&store).is_err());
        assert!(store.contains(USE_BACKUP).unwrap());
        assert_eq!(store.get_int(CARD_ZOOM, -1).unwrap(), 150);
    }
}
