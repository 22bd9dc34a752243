//! Nested-container teardown.
//!
//! A unit's presentation may embed containers of its own. Removing the unit
//! clears those containers and stages their units' removal into the same
//! transaction, recursively, so nothing outlives its owner.

use super::NavigationController;
use crate::hooks::LifecycleHooks;
use crate::transaction::TransactionBuilder;
use crate::types::ContainerId;
use crate::unit::UnitResolver;
use std::collections::HashSet;
use tracing::{trace, warn};

impl<R: UnitResolver, H: LifecycleHooks> NavigationController<R, H> {
    pub(crate) fn cascade_nested(&mut self, container: ContainerId, tag: &str, builder: &mut TransactionBuilder) {
        let mut visited = HashSet::from([container]);
        self.cascade_from(container, tag, builder, &mut visited);
    }

    fn cascade_from(
        &mut self,
        container: ContainerId,
        tag: &str,
        builder: &mut TransactionBuilder,
        visited: &mut HashSet<ContainerId>,
    ) {
        let nested = match self.resolver.resolve(container, tag) {
            Some(unit) => unit.embedded_containers(),
            None => {
                warn!(container = %container, tag, "Cannot resolve unit to scan for nested containers");
                return;
            }
        };

        for child in nested {
            if !visited.insert(child) {
                continue;
            }
            let child_tags = self.registry.clear(child);
            for child_tag in &child_tags {
                self.cascade_from(child, child_tag, builder, visited);
                builder.remove(child, child_tag.clone());
            }
            trace!(parent = %container, owner = tag, container = %child, tags = ?child_tags, "Cleared nested container");
        }
    }
}
