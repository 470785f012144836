use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use pretty_assertions::assert_eq;
use snes_tile_editor::{
    persist::{load_global_config, save_global_config, FileStore, Store},
    state::GlobalConfig,
};

fn scratch_dir(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "snes_tile_editor_{}_{}_{}",
        name,
        std::process::id(),
        n
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn file_store_round_trips_and_lists_keys() {
    let dir = scratch_dir("store");
    let mut store = FileStore::new(dir.clone());
    assert_eq!(store.read("document").unwrap(), None);
    store.write("document", b"{}").unwrap();
    store.write("backup", b"[]").unwrap();
    assert_eq!(store.read("document").unwrap(), Some(b"{}".to_vec()));
    assert_eq!(store.keys().unwrap(), vec!["backup".to_string(), "document".to_string()]);
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_config_gives_defaults() {
    let dir = scratch_dir("config_missing");
    let config = load_global_config(&dir.join("config.json")).unwrap();
    assert_eq!(config, GlobalConfig::default());
}

#[test]
fn config_is_saved_only_when_modified() {
    let dir = scratch_dir("config_save");
    let path = dir.join("config.json");
    let mut config = GlobalConfig::default();
    save_global_config(&path, &mut config).unwrap();
    assert!(!path.exists());

    config.history_limit = 7;
    config.modified = true;
    save_global_config(&path, &mut config).unwrap();
    assert!(!config.modified);
    let loaded = load_global_config(&path).unwrap();
    assert_eq!(loaded.history_limit, 7);
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn malformed_config_is_an_error() {
    let dir = scratch_dir("config_bad");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_global_config(&path).is_err());
    std::fs::remove_dir_all(dir).unwrap();
}
