//! Shared test utilities for integration tests
//!
//! Centralizes environment isolation so config tests that touch `XDG_*`,
//! `HOME` or `BACKSTACK*` variables never race each other.

use backstack::memory::{MemoryResolver, MemoryUnit, RecordingHooks};
use backstack::{NavigationController, Tag, Unit};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: &[&str] = &["HOME", "XDG_CONFIG_HOME", "XDG_DATA_HOME", "BACKSTACK_ENV"];

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(String, Option<String>)>,
}

impl EnvState {
    fn capture(extra: &[(&str, &str)]) -> Self {
        let saved = ISOLATED_VARS
            .iter()
            .copied()
            .chain(extra.iter().map(|(key, _)| *key))
            .map(|key| (key.to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }

    fn restore(self) {
        for (key, value) in self.saved {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Run `f` with XDG directories inside `test_dir` and `vars` set, then restore
/// the original environment.
pub fn with_env<F, R>(test_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture(vars);

    let test_config_home = test_dir.path().join("config-home");
    let test_data_home = test_dir.path().join("data");
    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_config_home).unwrap();
    std::fs::create_dir_all(&test_data_home).unwrap();
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());
    std::env::set_var("XDG_DATA_HOME", test_data_home.to_str().unwrap());
    std::env::remove_var("BACKSTACK_ENV");
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    env_state.restore();

    result
}

pub fn controller() -> NavigationController<MemoryResolver, RecordingHooks> {
    NavigationController::new(MemoryResolver::new(), RecordingHooks::new())
}

pub fn unit(tag: &str) -> Box<dyn Unit> {
    Box::new(MemoryUnit::new(tag))
}

pub fn tags(values: &[&str]) -> Vec<Tag> {
    values.iter().map(|v| v.to_string()).collect()
}
