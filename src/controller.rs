//! Navigation controller
//!
//! Orchestrates add / add-multiple / replace / back / pop-all / remove over a
//! set of independently addressed containers. Tag bookkeeping is synchronous;
//! unit attach/detach goes through [`Transaction`]s that are committed at once
//! or, for back-navigation of a visible unit, when its exit animation ends.
//!
//! The controller is single-threaded and not reentrant: hooks and unit
//! lifecycle calls must not call back into it. Animation completions are
//! collected with [`NavigationController::process_animations`] on the same loop.

use crate::animation::{Animator, AnimationCoordinator, AnimationTicket, Continuation, DefaultAnimations, StartOutcome};
use crate::back_press::BackPressGate;
use crate::config::BackstackConfig;
use crate::hooks::LifecycleHooks;
use crate::registry::ContainerRegistry;
use crate::transaction::{Notification, Transaction, TransactionBuilder};
use crate::types::{ContainerId, Tag, TransitionPhase};
use crate::unit::{Unit, UnitResolver};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

mod back;
mod cascade;

use back::BackTarget;

pub struct NavigationController<R: UnitResolver, H: LifecycleHooks> {
    registry: ContainerRegistry,
    resolver: R,
    hooks: H,
    animations: AnimationCoordinator,
    back_press: BackPressGate,
}

impl<R: UnitResolver, H: LifecycleHooks> NavigationController<R, H> {
    /// Controller with no animator: every transition takes the immediate path.
    pub fn new(resolver: R, hooks: H) -> Self {
        Self {
            registry: ContainerRegistry::new(),
            resolver,
            hooks,
            animations: AnimationCoordinator::default(),
            back_press: BackPressGate::default(),
        }
    }

    pub fn from_config(resolver: R, hooks: H, config: &BackstackConfig) -> Self {
        let mut controller = Self::new(resolver, hooks);
        let navigation = &config.navigation;
        controller.registry.set_back_if_exists(navigation.back_if_exists);
        if let Some(main) = navigation.main_container {
            controller.registry.set_main_container_id(ContainerId(main));
        }
        controller.back_press = BackPressGate::new(Duration::from_millis(navigation.back_press_interval_ms));
        controller.animations.set_defaults(config.animations.clone());
        controller
    }

    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animations.set_animator(Box::new(animator));
        self
    }

    pub fn with_default_animations(mut self, defaults: DefaultAnimations) -> Self {
        self.animations.set_defaults(defaults);
        self
    }

    // ----- operations -----

    /// Push `unit` on top of `container` under its own tag.
    pub fn add(&mut self, container: ContainerId, unit: Box<dyn Unit>) {
        let tag = unit.tag();
        self.add_with_tag(container, unit, tag);
    }

    pub fn add_with_tag(&mut self, container: ContainerId, unit: Box<dyn Unit>, tag: impl Into<Tag>) {
        let tag = tag.into();
        if self.registry.contains(container, &tag) {
            if self.registry.back_if_exists() {
                debug!(container = %container, tag = %tag, "Tag exists, navigating back to it");
                self.navigate_back(container, BackTarget::Tag(&tag));
            } else {
                debug!(container = %container, tag = %tag, "Tag exists, ignoring add");
            }
            return;
        }

        self.supersede_pending_removals(container, std::slice::from_ref(&tag));
        let covered = self.registry.top(container).cloned();
        if let Some(covered) = &covered {
            self.pause_unit(container, covered);
        }
        self.registry.push(container, tag.clone());
        if let Some(covered) = &covered {
            self.play_cover_exit(container, covered);
        }

        let mut builder = TransactionBuilder::new();
        builder.add(container, tag.clone(), unit);
        debug!(container = %container, tag = %tag, "Adding unit");
        self.commit_now(builder.build().with_notification(Notification::added(container, vec![tag])));
    }

    /// Push several units in one batch. Duplicate tags keep their first occurrence;
    /// tags already in the container are left where they are.
    pub fn add_multiple(&mut self, container: ContainerId, units: Vec<Box<dyn Unit>>) {
        let mut seen = HashSet::new();
        let requested: Vec<(Tag, Box<dyn Unit>)> = units
            .into_iter()
            .filter_map(|unit| {
                let tag = unit.tag();
                seen.insert(tag.clone()).then_some((tag, unit))
            })
            .collect();
        let fresh: Vec<(Tag, Box<dyn Unit>)> = requested
            .into_iter()
            .filter(|(tag, _)| !self.registry.contains(container, tag))
            .collect();
        if fresh.is_empty() {
            debug!(container = %container, "Nothing new to add");
            return;
        }

        let fresh_tags: Vec<Tag> = fresh.iter().map(|(tag, _)| tag.clone()).collect();
        self.supersede_pending_removals(container, &fresh_tags);
        if let Some(covered) = self.registry.top(container).cloned() {
            self.pause_unit(container, &covered);
        }

        let mut builder = TransactionBuilder::new();
        let mut tags = Vec::with_capacity(fresh.len());
        for (tag, unit) in fresh {
            self.registry.push(container, tag.clone());
            builder.add(container, tag.clone(), unit);
            tags.push(tag);
        }
        debug!(container = %container, tags = ?tags, "Adding units");
        self.commit_now(builder.build().with_notification(Notification::added(container, tags)));
    }

    /// Replace the top of `container` with `unit`, under the unit's own tag.
    pub fn replace(&mut self, container: ContainerId, unit: Box<dyn Unit>, clear_stack: bool) {
        let tag = unit.tag();
        self.replace_with_tag(container, unit, tag, clear_stack);
    }

    pub fn replace_with_tag(
        &mut self,
        container: ContainerId,
        unit: Box<dyn Unit>,
        tag: impl Into<Tag>,
        clear_stack: bool,
    ) {
        let tag = tag.into();
        if !self.registry.has_container(container) {
            self.add_with_tag(container, unit, tag);
            return;
        }
        if clear_stack {
            self.pop_all(container);
            self.add_with_tag(container, unit, tag);
            return;
        }

        let depth = self.registry.depth(container);
        if self.registry.contains(container, &tag) {
            if depth > 1 && !self.registry.is_top(container, &tag) {
                self.navigate_back(container, BackTarget::Tag(&tag));
            } else {
                debug!(container = %container, tag = %tag, "Replace target already on top");
            }
        } else if depth > 1 {
            let previous = self.registry.top(container).cloned();
            self.add_with_tag(container, unit, tag);
            if let Some(previous) = previous {
                self.remove(container, &previous);
            }
        } else {
            self.pop_all(container);
            self.add_with_tag(container, unit, tag);
        }
    }

    /// Back-navigate `container`.
    ///
    /// Without a target, every unit above the root is removed. With a target,
    /// units above it are removed and the target stays. A container holding at
    /// most one unit reports `on_last_unit_back` when no target is given.
    /// Tags whose units cannot be resolved are pruned from the stack with a
    /// warning instead of failing the navigation.
    pub fn back(&mut self, container: ContainerId, to_tag: Option<&str>) {
        let target = match to_tag {
            Some(tag) if !tag.is_empty() => BackTarget::Tag(tag),
            _ => BackTarget::Root,
        };
        self.navigate_back(container, target);
    }

    /// Remove only the current top of `container`.
    pub fn pop(&mut self, container: ContainerId) {
        self.navigate_back(container, BackTarget::Top);
    }

    /// Remove every unit of `container` in one batch.
    pub fn pop_all(&mut self, container: ContainerId) {
        let tags = self.registry.stack(container).to_vec();
        let Some(top) = tags.last().cloned() else {
            debug!(container = %container, "Nothing to pop");
            return;
        };

        let mut builder = TransactionBuilder::new();
        for tag in &tags {
            self.cascade_nested(container, tag, &mut builder);
            builder.remove(container, tag.clone());
        }
        self.registry.clear(container);
        self.play_cover_exit(container, &top);

        debug!(container = %container, tags = ?tags, "Popping all units");
        self.commit_now(builder.build().with_notification(Notification::removed(container, tags)));
    }

    /// Remove one tag from `container`. The top goes through single-step back.
    pub fn remove(&mut self, container: ContainerId, tag: &str) {
        if !self.registry.contains(container, tag) {
            debug!(container = %container, tag, "Tag not in container, nothing to remove");
            return;
        }
        if self.registry.is_top(container, tag) {
            self.navigate_back(container, BackTarget::Top);
            return;
        }

        let mut builder = TransactionBuilder::new();
        self.cascade_nested(container, tag, &mut builder);
        self.registry.remove(container, tag);
        builder.remove(container, tag);
        debug!(container = %container, tag, "Removing unit");
        self.commit_now(
            builder
                .build()
                .with_notification(Notification::removed(container, vec![tag.to_string()])),
        );
    }

    // ----- queries -----

    pub fn stack(&self, container: ContainerId) -> &[Tag] {
        self.registry.stack(container)
    }

    pub fn top_tag(&self, container: ContainerId) -> Option<&Tag> {
        self.registry.top(container)
    }

    /// Live top unit of `container`.
    pub fn top(&mut self, container: ContainerId) -> Option<&mut dyn Unit> {
        let tag = self.registry.top(container)?.clone();
        self.resolver.resolve(container, &tag)
    }

    /// Live unit for `tag`, only if the tag is in `container`'s stack.
    pub fn unit(&mut self, container: ContainerId, tag: &str) -> Option<&mut dyn Unit> {
        if !self.registry.contains(container, tag) {
            return None;
        }
        self.resolver.resolve(container, tag)
    }

    /// Top unit of the main container, where external results are forwarded.
    pub fn top_of_main(&mut self) -> Option<&mut dyn Unit> {
        let main = self.registry.main_container_id()?;
        self.top(main)
    }

    pub fn container_of(&self, tag: &str) -> Option<ContainerId> {
        self.registry.container_of(tag)
    }

    pub fn main_container_id(&self) -> Option<ContainerId> {
        self.registry.main_container_id()
    }

    pub fn set_main_container_id(&mut self, container: ContainerId) {
        self.registry.set_main_container_id(container);
    }

    pub fn back_if_exists(&self) -> bool {
        self.registry.back_if_exists()
    }

    pub fn set_back_if_exists(&mut self, value: bool) {
        self.registry.set_back_if_exists(value);
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    // ----- host lifecycle -----

    /// Run `init` once per navigation state. Restored states that were already
    /// initialised skip it.
    pub fn initialize_units<F>(&mut self, init: F) -> bool
    where
        F: FnOnce(&mut Self),
    {
        if self.registry.units_initialized() {
            return false;
        }
        self.registry.set_units_initialized(true);
        init(self);
        true
    }

    /// Debounced hardware back: single-step back on the main container.
    pub fn on_back_pressed(&mut self, now: Instant) -> bool {
        if !self.back_press.admit(now) {
            debug!("Back press ignored inside debounce window");
            return false;
        }
        match self.registry.main_container_id() {
            Some(main) => self.pop(main),
            None => debug!("Back press with no main container"),
        }
        true
    }

    /// A unit asks to leave whichever container holds it.
    pub fn finish_unit(&mut self, tag: &str) {
        match self.registry.container_of(tag) {
            Some(container) => self.remove(container, tag),
            None => debug!(tag, "Finished unit is not in any container"),
        }
    }

    /// Mark the host as finishing; the next [`Self::on_host_pause`] tears everything down.
    pub fn finish(&mut self) {
        self.registry.set_finished(true);
    }

    pub fn is_finished(&self) -> bool {
        self.registry.is_finished()
    }

    pub fn on_host_pause(&mut self) {
        if self.registry.is_finished() {
            self.clear_all();
        }
    }

    /// Detach every unit in every container. One removal notification per container.
    pub fn clear_all(&mut self) {
        for (container, tags) in self.registry.clear_all() {
            let mut builder = TransactionBuilder::new();
            for tag in &tags {
                builder.remove(container, tag.clone());
            }
            self.commit_now(builder.build().with_notification(Notification::removed(container, tags)));
        }
    }

    // ----- state -----

    pub fn snapshot(&self) -> ContainerRegistry {
        self.registry.clone()
    }

    /// Replace the navigation state wholesale. Call before any navigation request.
    pub fn restore(&mut self, state: ContainerRegistry) {
        if self.animations.pending_count() > 0 {
            warn!(pending = self.animations.pending_count(), "Restoring state with animations in flight");
        }
        self.registry = state;
    }

    // ----- animation completions -----

    /// Run continuations for every animation the host reported finished.
    /// Returns how many ran.
    pub fn process_animations(&mut self) -> usize {
        let ready = self.animations.drain_completed();
        let count = ready.len();
        for continuation in ready {
            self.run_continuation(continuation);
        }
        count
    }

    /// Complete one animation directly, bypassing the channel.
    pub fn complete_animation(&mut self, ticket: AnimationTicket) -> bool {
        match self.animations.complete(ticket) {
            Some(continuation) => {
                self.run_continuation(continuation);
                true
            }
            None => false,
        }
    }

    pub fn pending_animations(&self) -> usize {
        self.animations.pending_count()
    }

    pub fn pending_tickets(&self) -> Vec<AnimationTicket> {
        self.animations.pending_tickets()
    }

    // ----- internals -----

    fn commit_now(&mut self, transaction: Transaction) {
        let report = transaction.commit(&self.registry, &mut self.resolver, &mut self.hooks);
        for (container, tag) in report.attached {
            self.play_enter(container, &tag);
        }
    }

    /// A tag coming back while its removal still waits on an exit animation
    /// finishes that removal first, so the old instance is detached and
    /// reported before the new one attaches.
    fn supersede_pending_removals(&mut self, container: ContainerId, tags: &[Tag]) {
        let superseded: Vec<Tag> = tags
            .iter()
            .filter(|tag| self.animations.take_pending_removal(container, tag))
            .cloned()
            .collect();
        if superseded.is_empty() {
            return;
        }

        debug!(container = %container, tags = ?superseded, "Completing pending removal ahead of re-add");
        let mut builder = TransactionBuilder::new();
        for tag in &superseded {
            builder.remove(container, tag.clone());
        }
        self.commit_now(builder.build().with_notification(Notification::removed(container, superseded)));
    }

    fn run_continuation(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::Hide { container, tag } => {
                // A newer request may have brought the unit back on top.
                if self.registry.is_top(container, &tag) {
                    debug!(container = %container, tag = %tag, "Skipping hide of unit that is on top again");
                    return;
                }
                if let Some(unit) = self.resolver.resolve(container, &tag) {
                    unit.set_visible(false);
                }
            }
            Continuation::Commit(transaction) => self.commit_now(transaction),
            Continuation::Nothing => {}
        }
    }

    fn pause_unit(&mut self, container: ContainerId, tag: &str) {
        match self.resolver.resolve(container, tag) {
            Some(unit) => unit.pause(),
            None => warn!(container = %container, tag, "Cannot resolve unit to pause"),
        }
    }

    /// Exit transition of a unit that is being covered or cleared. Never gates anything.
    fn play_cover_exit(&mut self, container: ContainerId, tag: &str) {
        let animation = match self.resolver.resolve(container, tag) {
            Some(unit) if unit.is_presented() => unit.enter_out_animation(),
            _ => return,
        };
        let hide = Continuation::Hide {
            container,
            tag: tag.to_string(),
        };
        if let StartOutcome::NotStarted(continuation) =
            self.animations.start(container, tag, TransitionPhase::EnterOut, &animation, hide)
        {
            self.run_continuation(continuation);
        }
    }

    fn play_enter(&mut self, container: ContainerId, tag: &str) {
        let animation = match self.resolver.resolve(container, tag) {
            Some(unit) if unit.is_presented() => unit.enter_in_animation(),
            _ => return,
        };
        self.animations
            .start(container, tag, TransitionPhase::EnterIn, &animation, Continuation::Nothing);
    }
}
