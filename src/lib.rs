//! Backstack: multi-container navigation back-stack controller
//!
//! A host registers named containers, each holding an ordered stack of units.
//! The [`NavigationController`] applies add, replace, back and remove
//! requests, keeps tags unique per container, and commits unit attach/detach
//! either at once or after the outgoing unit's exit animation.

pub mod animation;
pub mod back_press;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod memory;
pub mod persistence;
pub mod registry;
pub mod script;
pub mod transaction;
pub mod types;
pub mod unit;

pub use animation::{AnimationRequest, AnimationTicket, Animator, CompletionSignal, DefaultAnimations, InstantAnimator};
pub use config::BackstackConfig;
pub use controller::NavigationController;
pub use error::{AnimationError, NavigationError};
pub use hooks::{LifecycleHooks, NoopHooks};
pub use registry::ContainerRegistry;
pub use types::{Animation, AnimationId, ContainerId, Tag, TransitionPhase};
pub use unit::{Unit, UnitResolver};
