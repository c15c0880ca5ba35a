use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use thinktank::storage::SledStore;

#[allow(dead_code)]
pub fn create_temp_store() -> (SledStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("store");
    let store = SledStore::open(db_path).expect("failed to open sled store with path");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
