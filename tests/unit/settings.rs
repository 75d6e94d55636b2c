use print2fax::crypto::decrypt_data;
use print2fax::settings::{SettingsError, SettingsStore};
use print2fax::types::Credentials;
use std::fs;
use tempfile::TempDir;

fn credentials() -> Credentials {
    Credentials {
        username: "alice".to_string(),
        password: "s3cret".to_string(),
        hostname: "https://fax.example.com".to_string(),
    }
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.bin"));
    store.save(&credentials()).unwrap();
    assert_eq!(store.load().unwrap(), credentials());
}

#[test]
fn test_save_creates_parent_dir() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("bin").join("settings.bin"));
    store.save(&credentials()).unwrap();
    assert!(store.exists());
}

#[test]
fn test_file_is_not_plaintext() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.bin"));
    store.save(&credentials()).unwrap();

    let raw = fs::read(store.path()).unwrap();
    let text = String::from_utf8_lossy(&raw);
    assert!(!text.contains("s3cret"));

    let json: serde_json::Value = serde_json::from_slice(&decrypt_data(&raw).unwrap()).unwrap();
    assert_eq!(json["username"], "alice");
    assert_eq!(json["host"], "https://fax.example.com");
}

#[test]
fn test_logout_then_load_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.bin"));
    store.save(&credentials()).unwrap();
    store.logout().unwrap();
    assert!(!store.exists());
    assert!(matches!(store.load(), Err(SettingsError::NotFound)));
}

#[test]
fn test_logout_without_file() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.bin"));
    assert!(store.logout().is_ok());
    assert!(store.logout().is_ok());
}

#[test]
fn test_save_overwrites() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.bin"));
    store.save(&credentials()).unwrap();
    let updated = Credentials {
        password: "rotated".to_string(),
        ..credentials()
    };
    store.save(&updated).unwrap();
    assert_eq!(store.load().unwrap().password, "rotated");
}

#[test]
fn test_tampered_file_is_not_reported_as_missing() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.bin"));
    store.save(&credentials()).unwrap();
    let mut raw = fs::read(store.path()).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0xff;
    fs::write(store.path(), raw).unwrap();
    assert!(matches!(store.load(), Err(SettingsError::Crypto(_))));
}

#[test]
fn test_not_found_message() {
    assert_eq!(
        SettingsError::NotFound.to_string(),
        "the settings file not found"
    );
}
