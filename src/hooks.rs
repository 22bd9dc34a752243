//! Host lifecycle notifications.

use crate::types::{ContainerId, Tag};

/// Callbacks the controller fires towards its host.
///
/// All methods default to no-ops so a host only overrides what it observes.
pub trait LifecycleHooks {
    /// Back was requested on a container holding at most one unit.
    fn on_last_unit_back(&mut self, _container: ContainerId) {}

    /// Units were committed to a container, in stack order.
    fn on_unit_added(&mut self, _container: ContainerId, _tags: &[Tag]) {}

    /// Units were detached from a container, in removal order.
    fn on_unit_removed(&mut self, _container: ContainerId, _tags: &[Tag]) {}
}

/// Hooks that ignore every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl LifecycleHooks for NoopHooks {}
