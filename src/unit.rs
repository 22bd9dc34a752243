//! Unit contract and host-side unit lookup.
//!
//! Units are constructed and owned by the host. The controller only ever
//! refers to them by `(container, tag)` and reaches the live instance through
//! a [`UnitResolver`].

use crate::types::{short_type_name, Animation, ContainerId, Tag};

/// A presentable screen with a pause/resume lifecycle.
pub trait Unit {
    /// Identity within a container. Defaults to the implementing type's name.
    fn tag(&self) -> Tag {
        short_type_name::<Self>().to_string()
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    /// Called when an ADD for this unit is committed.
    fn attach(&mut self, _container: ContainerId) {}

    /// Called when a REMOVE for this unit is committed.
    fn detach(&mut self) {}

    fn enter_in_animation(&self) -> Animation {
        Animation::Default
    }

    fn enter_out_animation(&self) -> Animation {
        Animation::Default
    }

    fn back_in_animation(&self) -> Animation {
        Animation::Default
    }

    fn back_out_animation(&self) -> Animation {
        Animation::Default
    }

    /// Whether the unit currently has a live, visible presentation surface.
    /// Units without one are never animated.
    fn is_presented(&self) -> bool {
        false
    }

    fn set_visible(&mut self, _visible: bool) {}

    /// Sub-containers embedded in this unit's presentation.
    fn embedded_containers(&self) -> Vec<ContainerId> {
        Vec::new()
    }
}

/// Host port that owns live unit instances.
pub trait UnitResolver {
    /// Live unit registered under `tag` in `container`, if any.
    fn resolve(&mut self, container: ContainerId, tag: &str) -> Option<&mut dyn Unit>;

    /// Take ownership of a newly committed unit.
    fn attach(&mut self, container: ContainerId, tag: &str, unit: Box<dyn Unit>);

    /// Release a unit. Detaching an absent tag returns `None` and does nothing else.
    fn detach(&mut self, container: ContainerId, tag: &str) -> Option<Box<dyn Unit>>;
}
