//! Container registry: container ID -> ordered tag stack, plus the navigation flags.
//!
//! This is the whole of the persisted navigation state. It is pure bookkeeping;
//! nothing here touches live units.

use crate::types::{ContainerId, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRegistry {
    /// Stacks are stored bottom-to-top.
    containers: BTreeMap<ContainerId, Vec<Tag>>,
    main_container: Option<ContainerId>,
    units_initialized: bool,
    finished: bool,
    back_if_exists: bool,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered tags of a container; empty if the container is absent.
    pub fn stack(&self, container: ContainerId) -> &[Tag] {
        self.containers
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_container(&self, container: ContainerId) -> bool {
        self.containers.contains_key(&container)
    }

    pub fn depth(&self, container: ContainerId) -> usize {
        self.stack(container).len()
    }

    pub fn contains(&self, container: ContainerId, tag: &str) -> bool {
        self.stack(container).iter().any(|t| t == tag)
    }

    pub fn top(&self, container: ContainerId) -> Option<&Tag> {
        self.stack(container).last()
    }

    pub fn is_top(&self, container: ContainerId, tag: &str) -> bool {
        self.top(container).is_some_and(|t| t == tag)
    }

    /// Creates the container if needed without adding anything to it.
    pub fn ensure(&mut self, container: ContainerId) {
        self.containers.entry(container).or_default();
    }

    /// Appends `tag` on top of `container`, creating the container on first use.
    ///
    /// Returns `false` and leaves the stack untouched if the tag is already present.
    /// The first container that receives a tag becomes the main container unless
    /// one was set explicitly.
    pub fn push(&mut self, container: ContainerId, tag: impl Into<Tag>) -> bool {
        let tag = tag.into();
        let stack = self.containers.entry(container).or_default();
        if stack.contains(&tag) {
            return false;
        }
        stack.push(tag);
        if self.main_container.is_none() {
            self.main_container = Some(container);
        }
        true
    }

    /// Drops `tag` from `container`. Returns whether anything was removed.
    pub fn remove(&mut self, container: ContainerId, tag: &str) -> bool {
        match self.containers.get_mut(&container) {
            Some(stack) => match stack.iter().position(|t| t == tag) {
                Some(index) => {
                    stack.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Empties a container, keeping its entry. Returns the tags it held, bottom-to-top.
    pub fn clear(&mut self, container: ContainerId) -> Vec<Tag> {
        self.containers
            .get_mut(&container)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Removes every container. Returns the non-empty stacks that were dropped.
    pub fn clear_all(&mut self) -> Vec<(ContainerId, Vec<Tag>)> {
        std::mem::take(&mut self.containers)
            .into_iter()
            .filter(|(_, tags)| !tags.is_empty())
            .collect()
    }

    /// Container currently holding `tag`, lowest container ID first.
    pub fn container_of(&self, tag: &str) -> Option<ContainerId> {
        self.containers
            .iter()
            .find(|(_, tags)| tags.iter().any(|t| t == tag))
            .map(|(id, _)| *id)
    }

    pub fn container_ids(&self) -> Vec<ContainerId> {
        self.containers.keys().copied().collect()
    }

    pub fn main_container_id(&self) -> Option<ContainerId> {
        self.main_container
    }

    pub fn set_main_container_id(&mut self, container: ContainerId) {
        self.main_container = Some(container);
    }

    pub fn units_initialized(&self) -> bool {
        self.units_initialized
    }

    pub fn set_units_initialized(&mut self, value: bool) {
        self.units_initialized = value;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_finished(&mut self, value: bool) {
        self.finished = value;
    }

    pub fn back_if_exists(&self) -> bool {
        self.back_if_exists
    }

    pub fn set_back_if_exists(&mut self, value: bool) {
        self.back_if_exists = value;
    }
}
