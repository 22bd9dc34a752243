//! Integration tests for Configuration System

use super::test_utils::{tags, unit, with_env};
use backstack::config::{global_config_path, ConfigLoader};
use backstack::memory::{MemoryResolver, RecordingHooks};
use backstack::{ContainerId, NavigationController};
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[test]
fn test_load_from_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("backstack.toml");
    std::fs::write(
        &config_file,
        r#"
[navigation]
back_if_exists = true
main_container = 9

[animations]
back_out = "fade_out"

[logging]
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert!(config.navigation.back_if_exists);
    assert_eq!(config.navigation.main_container, Some(9));
    assert_eq!(config.navigation.back_press_interval_ms, 300);
    assert_eq!(config.animations.back_out, "fade_out");
    assert_eq!(config.animations.back_in, "slide_in_left");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&temp_dir.path().join("nope.toml")).is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(&config_file, "[animations]\nadd_in = \"\"\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_layered_sources_precedence() {
    let test_dir = TempDir::new().unwrap();
    let root = test_dir.path().join("project");
    std::fs::create_dir_all(root.join("config")).unwrap();
    std::fs::write(
        root.join("config").join("config.toml"),
        "[navigation]\nback_press_interval_ms = 500\nback_if_exists = true\n",
    )
    .unwrap();
    std::fs::write(
        root.join("config").join("staging.toml"),
        "[navigation]\nback_press_interval_ms = 800\n",
    )
    .unwrap();

    let config = with_env(
        &test_dir,
        &[
            ("BACKSTACK_ENV", "staging"),
            ("BACKSTACK__ANIMATIONS__ADD_IN", "pop_in"),
        ],
        || {
            let global = global_config_path().unwrap();
            std::fs::create_dir_all(global.parent().unwrap()).unwrap();
            std::fs::write(&global, "[animations]\nadd_in = \"global_in\"\nadd_out = \"global_out\"\n").unwrap();
            ConfigLoader::load(&root).unwrap()
        },
    );

    assert_eq!(config.navigation.back_press_interval_ms, 800);
    assert!(config.navigation.back_if_exists);
    assert_eq!(config.animations.add_in, "pop_in");
    assert_eq!(config.animations.add_out, "global_out");
}

#[test]
fn test_controller_from_loaded_config() {
    let test_dir = TempDir::new().unwrap();
    let root = test_dir.path().join("project");
    std::fs::create_dir_all(root.join("config")).unwrap();
    std::fs::write(
        root.join("config").join("config.toml"),
        "[navigation]\nback_if_exists = true\nback_press_interval_ms = 50\nmain_container = 2\n",
    )
    .unwrap();

    let config = with_env(&test_dir, &[], || ConfigLoader::load(&root).unwrap());
    let mut nav = NavigationController::from_config(MemoryResolver::new(), RecordingHooks::new(), &config);
    let main = ContainerId(2);

    nav.add(ContainerId(1), unit("Elsewhere"));
    nav.add_multiple(main, vec![unit("A"), unit("B"), unit("C")]);
    assert_eq!(nav.main_container_id(), Some(main));

    nav.add(main, unit("A"));
    assert_eq!(nav.stack(main), tags(&["A"]).as_slice());

    nav.add(main, unit("B"));
    let start = Instant::now();
    assert!(nav.on_back_pressed(start));
    assert!(nav.on_back_pressed(start + Duration::from_millis(60)));
    assert_eq!(nav.stack(main), tags(&["A"]).as_slice());
    assert_eq!(nav.hooks().last_unit_backs(), vec![main]);
}
