use std::fs;
use std::path::PathBuf;
use std::process::Command;

use bibleref::settings::Settings;
use bibleref::BiblerefError;

fn scratch(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bibleref-settings-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults_without_a_file() {
    let settings = Settings::load(None).unwrap();
    assert_eq!(settings.default_version, "esv");
    assert!(!settings.only_bracketed);
    assert_eq!(settings.books, None);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.registry().unwrap().len(), 85);
}

#[test]
fn settings_file_overrides_defaults() {
    let path = scratch(
        "overrides.toml",
        "default_version = \"kjv\"\nonly_bracketed = true\ndatabase = \"prefs.db\"\n",
    );
    let settings = Settings::load(path.to_str()).unwrap();
    assert_eq!(settings.default_version, "kjv");
    assert!(settings.only_bracketed);
    assert_eq!(settings.database.as_deref(), Some("prefs.db"));
    assert_eq!(settings.books, None);
}

#[test]
fn missing_settings_file_is_an_error() {
    let path = std::env::temp_dir().join("bibleref-no-such-settings.toml");
    assert!(matches!(
        Settings::load(path.to_str()),
        Err(BiblerefError::Config(_))
    ));
}

#[test]
fn registry_from_a_dataset_file() {
    let books = scratch(
        "books.json",
        r#"[{"name": "Obadiah", "osis": "Obad", "paratext": "OBA", "alt": ["Ob"], "section": 1}]"#,
    );
    let settings = Settings {
        books: books.to_str().map(str::to_owned),
        ..Settings::default()
    };
    let registry = settings.registry().unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.canonical_name("ob"), Some("Obadiah"));

    let missing = Settings {
        books: Some("/no/such/books.json".to_string()),
        ..Settings::default()
    };
    assert!(matches!(missing.registry(), Err(BiblerefError::Io(_))));
}

// set in the copy of this test binary that checks the environment layer
const CHILD_FILE: &str = "SETTINGS_ENV_CHILD_FILE";

#[test]
fn environment_overrides_file_and_defaults() {
    if let Some(path) = std::env::var_os(CHILD_FILE) {
        let settings = Settings::load(path.to_str()).unwrap();
        assert!(settings.only_bracketed);
        assert_eq!(settings.default_version, "nasb");
        assert_eq!(settings.database.as_deref(), Some("from-file.db"));
        return;
    }
    let path = scratch(
        "environment.toml",
        "default_version = \"kjv\"\nonly_bracketed = false\ndatabase = \"from-file.db\"\n",
    );
    let status = Command::new(std::env::current_exe().unwrap())
        .args(["environment_overrides_file_and_defaults", "--exact", "--nocapture"])
        .env(CHILD_FILE, &path)
        .env("BIBLEREF_ONLY_BRACKETED", "true")
        .env("BIBLEREF_DEFAULT_VERSION", "nasb")
        .status()
        .unwrap();
    assert!(status.success());
}
