//! Core identifiers shared across the navigation controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a unit within one container. Unique per container.
pub type Tag = String;

/// Opaque identifier of a named container slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub u32);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ContainerId {
    fn from(id: u32) -> Self {
        ContainerId(id)
    }
}

/// Named animation resource understood by the host's animator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub String);

impl AnimationId {
    pub fn new(name: impl Into<String>) -> Self {
        AnimationId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a unit returns for each of its four transition slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Animation {
    /// Use the configured default for the phase.
    #[default]
    Default,
    Custom(AnimationId),
}

/// The four transition slots a unit can customise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Unit is being added on top.
    EnterIn,
    /// Unit is being covered by a newly added unit.
    EnterOut,
    /// Unit becomes top again after back-navigation.
    BackIn,
    /// Unit is leaving through back-navigation.
    BackOut,
}

impl TransitionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionPhase::EnterIn => "enter_in",
            TransitionPhase::EnterOut => "enter_out",
            TransitionPhase::BackIn => "back_in",
            TransitionPhase::BackOut => "back_out",
        }
    }
}

/// Short type name used as the default tag of a unit (`my::screens::Home` -> `Home`).
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
