//! End-to-end tests of the built-in upgrades through the public entry points,
//! against both the in-memory store and a real LMDB environment.

use prefs_display::{FullScreenMode, LEGACY_PREF_KEY_NAME};
use prefs_nullables::NullPreferenceStore;
use prefs_store::PreferenceStore;
use prefs_store_lmdb::LmdbEnvironment;
use prefs_types::{LegacyVersionCode, PrefValue, UpgradeVersion};
use prefs_upgrade::legacy::{BACKUP_MAX, CARD_ZOOM, RELATIVE_DISPLAY_FONT_SIZE, USE_BACKUP};
use prefs_upgrade::{
    mark_preferences_up_to_date, upgrade_preferences, PreferenceUpgradeService,
    UpgradeRegistry, PreferenceUpgrades, PREFERENCE_UPGRADE_VERSION_KEY,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).expect("open env");
    (dir, env)
}

fn code(raw: i64) -> LegacyVersionCode {
    LegacyVersionCode::new(raw)
}

fn stored_version(store: &dyn PreferenceStore) -> i64 {
    store.get_int(PREFERENCE_UPGRADE_VERSION_KEY, -1).unwrap()
}

// ---------------------------------------------------------------------------
// Built-in registry
// ---------------------------------------------------------------------------

#[test]
fn latest_builtin_version_is_one() {
    assert_eq!(PreferenceUpgrades.latest_version(), UpgradeVersion::new(1));
}

#[test]
fn very_old_install_is_reset() {
    let store = NullPreferenceStore::with_entries([
        ("lastDeck", PrefValue::Int(42)),
        ("nightMode", PrefValue::Bool(true)),
    ]);
    assert!(upgrade_preferences(&store, code(20300100)).unwrap());

    assert_eq!(store.get_int("lastDeck", 0).unwrap(), 0);
    assert!(!store.get_bool("nightMode", false).unwrap());
    assert_eq!(stored_version(&store), 1);
}

#[test]
fn pre_zoom_install_is_migrated() {
    let store = NullPreferenceStore::with_entries([
        (RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(150)),
        (USE_BACKUP, PrefValue::Bool(false)),
    ]);
    assert!(upgrade_preferences(&store, code(20500100)).unwrap());

    assert_eq!(store.get_int(CARD_ZOOM, 100).unwrap(), 150);
    assert!(!store.contains(USE_BACKUP).unwrap());
    assert_eq!(store.get_int(BACKUP_MAX, -1).unwrap(), 0);
    assert_eq!(stored_version(&store), 1);
}

#[test]
fn recent_install_only_records_version() {
    let store = NullPreferenceStore::with_entries([
        (RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(150)),
        (USE_BACKUP, PrefValue::Bool(false)),
    ]);
    let mut expected = store.snapshot();
    expected.insert(PREFERENCE_UPGRADE_VERSION_KEY.to_string(), PrefValue::Int(1));

    assert!(upgrade_preferences(&store, code(20500300)).unwrap());
    assert_eq!(store.snapshot(), expected);
}

#[test]
fn second_upgrade_is_noop() {
    let store = NullPreferenceStore::with_entries([(RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(130))]);
    assert!(upgrade_preferences(&store, code(20500100)).unwrap());
    let writes = store.write_count();

    // Even a build number that would clear everything runs nothing now.
    assert!(!upgrade_preferences(&store, code(20300100)).unwrap());
    assert_eq!(store.write_count(), writes);
    assert_eq!(store.get_int(CARD_ZOOM, 100).unwrap(), 130);
}

#[test]
fn fresh_install_marked_up_to_date_never_upgrades() {
    let store = NullPreferenceStore::with_entries([("lastDeck", PrefValue::Int(42))]);
    mark_preferences_up_to_date(&store).unwrap();
    assert_eq!(stored_version(&store), 1);

    assert!(!upgrade_preferences(&store, code(20300100)).unwrap());
    assert_eq!(store.get_int("lastDeck", 0).unwrap(), 42);
}

#[test]
fn failed_legacy_step_stays_pending() {
    let store = NullPreferenceStore::with_entries([
        (RELATIVE_DISPLAY_FONT_SIZE, PrefValue::Int(150)),
        (LEGACY_PREF_KEY_NAME, PrefValue::Bool(true)),
    ]);
    // Writes: cardZoom, imageZoom, remove useBackup, remove
    // intentAdditionInstantAdd, fullscreenMode (fails).
    store.fail_nth_write(4);
    assert!(upgrade_preferences(&store, code(20500100)).is_err());
    assert!(!store.contains(PREFERENCE_UPGRADE_VERSION_KEY).unwrap());

    assert!(upgrade_preferences(&store, code(20500100)).unwrap());
    assert_eq!(stored_version(&store), 1);
    assert_eq!(
        FullScreenMode::from_preferences(&store).unwrap(),
        FullScreenMode::ButtonsOnly
    );
}

#[test]
fn status_of_fresh_and_upgraded_store() {
    let service = PreferenceUpgradeService::builtin();
    let store = NullPreferenceStore::new();

    let before = service.status(&store).unwrap();
    assert_eq!(before.current, UpgradeVersion::NONE);
    assert_eq!(before.pending, vec![UpgradeVersion::new(1)]);

    service.apply_upgrades(&store, code(20500300)).unwrap();
    assert!(service.status(&store).unwrap().is_up_to_date());
}

// ---------------------------------------------------------------------------
// LMDB
// ---------------------------------------------------------------------------

#[test]
fn lmdb_upgrade_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    {
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).unwrap();
        let store = env.preference_store();
        store.set_int(RELATIVE_DISPLAY_FONT_SIZE, 175).unwrap();
        store.set_bool(USE_BACKUP, false).unwrap();
        assert!(upgrade_preferences(&store, code(20500100)).unwrap());
    }

    let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).unwrap();
    let store = env.preference_store();
    assert_eq!(stored_version(&store), 1);
    assert_eq!(store.get_int(CARD_ZOOM, 100).unwrap(), 175);
    assert_eq!(store.get_int(BACKUP_MAX, -1).unwrap(), 0);
    assert!(!upgrade_preferences(&store, code(20500100)).unwrap());
}

#[test]
fn lmdb_reset_clears_everything() {
    let (_dir, env) = temp_env();
    let store = env.preference_store();
    store.set_string("deckPath", "/sdcard/AnkiDroid").unwrap();
    store.set_int("lastDeck", 3).unwrap();

    assert!(upgrade_preferences(&store, code(20300100)).unwrap());
    assert!(!store.contains("deckPath").unwrap());
    assert!(!store.contains("lastDeck").unwrap());
    assert_eq!(stored_version(&store), 1);
}
