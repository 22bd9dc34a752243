//! Configuration System
//!
//! Layered configuration for the navigation controller: defaults, an optional
//! user-level file, project files and `BACKSTACK__*` environment overrides.

use crate::animation::DefaultAnimations;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackstackConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Animation ids used when a unit asks for the default transition
    #[serde(default)]
    pub animations: DefaultAnimations,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Navigation policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Adding an existing tag navigates back to it instead of being ignored
    #[serde(default)]
    pub back_if_exists: bool,

    /// Minimum gap between two admitted back presses
    #[serde(default = "default_back_press_interval_ms")]
    pub back_press_interval_ms: u64,

    /// Explicit main container; otherwise the first populated one
    #[serde(default)]
    pub main_container: Option<u32>,
}

fn default_back_press_interval_ms() -> u64 {
    300
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            back_if_exists: false,
            back_press_interval_ms: default_back_press_interval_ms(),
            main_container: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Animations(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Animations(msg) => write!(f, "Animations: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl BackstackConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.animations.validate() {
            errors.push(ValidationError::Animations(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
