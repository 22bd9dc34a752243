//! Error types for the navigation controller and its ambient surfaces.
//!
//! Navigation operations themselves are total and never return these.

use crate::types::{AnimationId, ContainerId, Tag};
use thiserror::Error;

/// Failures reported by a host animator. Always recoverable: the transition
/// falls back to the non-animated path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnimationError {
    #[error("Animation resource not found: {0}")]
    MissingResource(AnimationId),

    #[error("Unit {tag} in container {container} has no live presentation")]
    NoPresentation { container: ContainerId, tag: Tag },

    #[error("Animator rejected request: {0}")]
    Rejected(String),
}

/// Errors from configuration, persistence and script handling.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Persistence I/O error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },
}

impl From<config::ConfigError> for NavigationError {
    fn from(err: config::ConfigError) -> Self {
        NavigationError::Config(err.to_string())
    }
}

impl From<bincode::Error> for NavigationError {
    fn from(err: bincode::Error) -> Self {
        NavigationError::Serialization(err.to_string())
    }
}
