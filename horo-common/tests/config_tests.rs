//! Tests for bootstrap configuration and root folder resolution
//!
//! Uses serial_test: tests that manipulate HORO_ROOT_FOLDER or HORO_ROOT
//! are marked #[serial] so they never run in parallel.

use horo_common::config::{
    CompiledDefaults, LoggingConfig, RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn clear_env() {
    env::remove_var("HORO_ROOT_FOLDER");
    env::remove_var("HORO_ROOT");
}

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert_eq!(defaults.log_level, "info");
    assert!(defaults.log_file.is_none());
    assert!(defaults.root_folder.to_string_lossy().contains("horo"));
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    clear_env();

    let resolver = RootFolderResolver::new("test-module").with_toml_config(TomlConfig::default());
    let root_folder = resolver.resolve();

    assert_eq!(root_folder, CompiledDefaults::for_current_platform().root_folder);
}

#[test]
#[serial]
fn test_resolver_env_var_horo_root_folder() {
    clear_env();
    env::set_var("HORO_ROOT_FOLDER", "/tmp/horo-test-env-folder");

    let resolver = RootFolderResolver::new("test-module").with_toml_config(TomlConfig::default());
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/horo-test-env-folder"));

    clear_env();
}

#[test]
#[serial]
fn test_resolver_root_folder_takes_precedence_over_root() {
    clear_env();
    env::set_var("HORO_ROOT_FOLDER", "/tmp/horo-priority-1");
    env::set_var("HORO_ROOT", "/tmp/horo-priority-2");

    let resolver = RootFolderResolver::new("test-module").with_toml_config(TomlConfig::default());
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/horo-priority-1"));

    clear_env();
}

#[test]
#[serial]
fn test_resolver_cli_arg_wins() {
    clear_env();
    env::set_var("HORO_ROOT_FOLDER", "/tmp/horo-from-env");

    let resolver = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/horo-from-cli")));
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/horo-from-cli"));

    clear_env();
}

#[test]
#[serial]
fn test_resolver_uses_toml_root_folder() {
    clear_env();

    let config = TomlConfig::from_toml_str("root_folder = \"/tmp/horo-from-toml\"").unwrap();
    let resolver = RootFolderResolver::new("test-module").with_toml_config(config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/horo-from-toml"));
}

#[test]
fn test_toml_config_full() {
    let config = TomlConfig::from_toml_str(
        r#"
        root_folder = "/srv/horo"
        content_dir = "/srv/horo-content"
        default_locale = "fr"

        [logging]
        level = "debug"
        file = "/var/log/horo.log"
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/horo")));
    assert_eq!(config.content_dir, Some(PathBuf::from("/srv/horo-content")));
    assert_eq!(config.default_locale(), "fr");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/horo.log")));
}

#[test]
fn test_toml_config_empty_uses_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();

    assert!(config.root_folder.is_none());
    assert!(config.content_dir.is_none());
    assert_eq!(config.default_locale(), "en");
    assert_eq!(config.logging.level, LoggingConfig::default().level);
}

#[test]
fn test_toml_config_ignores_unknown_keys() {
    let config = TomlConfig::from_toml_str("theme = \"dark\"\nroot_folder = \"/x\"").unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/x")));
}

#[test]
fn test_toml_config_invalid() {
    assert!(TomlConfig::from_toml_str("root_folder = [").is_err());
}

#[test]
fn test_toml_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "default_locale = \"de\"\n").unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.default_locale(), "de");
}

#[test]
fn test_initializer_paths() {
    let root = PathBuf::from("/tmp/horo-test-root");
    let initializer = RootFolderInitializer::new(root.clone());

    assert_eq!(initializer.database_path(), root.join("horo.db"));
    assert_eq!(initializer.content_path(), root.join("content"));
}

#[test]
fn test_initializer_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("horo");
    let initializer = RootFolderInitializer::new(root.clone());

    assert!(!root.exists());
    initializer.ensure_directory_exists().unwrap();
    assert!(root.is_dir());
    assert!(!initializer.database_exists());
}
