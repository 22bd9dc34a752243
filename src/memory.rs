//! In-memory host: units, resolver, hooks and a hand-driven animator.
//!
//! Used by the script runner and as the host in tests. Everything here is
//! single-threaded and shares state through `Rc<RefCell<_>>` so a caller can
//! keep a handle after moving a value into the controller.

use crate::animation::{AnimationRequest, Animator, CompletionSignal};
use crate::error::AnimationError;
use crate::hooks::LifecycleHooks;
use crate::transaction::Notification;
use crate::types::{Animation, ContainerId, Tag};
use crate::unit::{Unit, UnitResolver};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Pause(Tag),
    Resume(Tag),
    Attach(Tag, ContainerId),
    Detach(Tag),
    Show(Tag),
    Hide(Tag),
}

/// Shared log of unit lifecycle calls.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<LifecycleEvent>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: LifecycleEvent) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug, Clone)]
pub struct MemoryUnit {
    tag: Tag,
    presented: bool,
    visible: bool,
    embedded: Vec<ContainerId>,
    back_out: Animation,
    journal: Journal,
}

impl MemoryUnit {
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            presented: false,
            visible: false,
            embedded: Vec::new(),
            back_out: Animation::Default,
            journal: Journal::new(),
        }
    }

    /// Give the unit a live presentation, so its transitions are animated.
    pub fn presented(mut self) -> Self {
        self.presented = true;
        self.visible = true;
        self
    }

    pub fn embedding(mut self, container: ContainerId) -> Self {
        self.embedded.push(container);
        self
    }

    pub fn with_back_out(mut self, animation: Animation) -> Self {
        self.back_out = animation;
        self
    }

    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = journal.clone();
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Unit for MemoryUnit {
    fn tag(&self) -> Tag {
        self.tag.clone()
    }

    fn pause(&mut self) {
        self.journal.record(LifecycleEvent::Pause(self.tag.clone()));
    }

    fn resume(&mut self) {
        self.journal.record(LifecycleEvent::Resume(self.tag.clone()));
    }

    fn attach(&mut self, container: ContainerId) {
        self.journal
            .record(LifecycleEvent::Attach(self.tag.clone(), container));
    }

    fn detach(&mut self) {
        self.journal.record(LifecycleEvent::Detach(self.tag.clone()));
    }

    fn back_out_animation(&self) -> Animation {
        self.back_out.clone()
    }

    fn is_presented(&self) -> bool {
        self.presented
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            let event = if visible {
                LifecycleEvent::Show(self.tag.clone())
            } else {
                LifecycleEvent::Hide(self.tag.clone())
            };
            self.journal.record(event);
        }
        self.visible = visible;
    }

    fn embedded_containers(&self) -> Vec<ContainerId> {
        self.embedded.clone()
    }
}

/// Resolver backed by a map keyed on `(container, tag)`.
#[derive(Default)]
pub struct MemoryResolver {
    units: HashMap<(ContainerId, Tag), Box<dyn Unit>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, container: ContainerId, tag: &str) -> bool {
        self.units.contains_key(&(container, tag.to_string()))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Attached `(container, tag)` pairs, sorted.
    pub fn attached(&self) -> Vec<(ContainerId, Tag)> {
        let mut keys: Vec<_> = self.units.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl UnitResolver for MemoryResolver {
    fn resolve(&mut self, container: ContainerId, tag: &str) -> Option<&mut dyn Unit> {
        let unit = self.units.get_mut(&(container, tag.to_string()))?;
        Some(unit.as_mut())
    }

    fn attach(&mut self, container: ContainerId, tag: &str, unit: Box<dyn Unit>) {
        self.units.insert((container, tag.to_string()), unit);
    }

    fn detach(&mut self, container: ContainerId, tag: &str) -> Option<Box<dyn Unit>> {
        self.units.remove(&(container, tag.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    LastUnitBack(ContainerId),
    Notified(Notification),
}

/// Hooks that remember every call, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingHooks {
    log: Vec<HookEvent>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &[HookEvent] {
        &self.log
    }

    /// Added/removed notifications only.
    pub fn events(&self) -> Vec<Notification> {
        self.log
            .iter()
            .filter_map(|event| match event {
                HookEvent::Notified(notification) => Some(notification.clone()),
                HookEvent::LastUnitBack(_) => None,
            })
            .collect()
    }

    pub fn last_unit_backs(&self) -> Vec<ContainerId> {
        self.log
            .iter()
            .filter_map(|event| match event {
                HookEvent::LastUnitBack(container) => Some(*container),
                HookEvent::Notified(_) => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl LifecycleHooks for RecordingHooks {
    fn on_last_unit_back(&mut self, container: ContainerId) {
        self.log.push(HookEvent::LastUnitBack(container));
    }

    fn on_unit_added(&mut self, container: ContainerId, tags: &[Tag]) {
        self.log
            .push(HookEvent::Notified(Notification::added(container, tags.to_vec())));
    }

    fn on_unit_removed(&mut self, container: ContainerId, tags: &[Tag]) {
        self.log
            .push(HookEvent::Notified(Notification::removed(container, tags.to_vec())));
    }
}

#[derive(Default)]
struct ManualAnimatorState {
    requests: Vec<AnimationRequest>,
    in_flight: Vec<CompletionSignal>,
    failure: Option<AnimationError>,
}

/// Animator whose transitions only end when the caller says so.
///
/// Clones share state, so keep one handle and give another to the controller.
#[derive(Clone, Default)]
pub struct ManualAnimator {
    state: Rc<RefCell<ManualAnimatorState>>,
}

impl ManualAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `play` fail with `error`, or succeed again with `None`.
    pub fn fail_with(&self, error: Option<AnimationError>) {
        self.state.borrow_mut().failure = error;
    }

    pub fn requests(&self) -> Vec<AnimationRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn in_flight(&self) -> usize {
        self.state.borrow().in_flight.len()
    }

    /// Fire every outstanding completion signal. Returns how many were fired.
    pub fn finish_all(&self) -> usize {
        let signals = std::mem::take(&mut self.state.borrow_mut().in_flight);
        let count = signals.len();
        for signal in signals {
            signal.complete();
        }
        count
    }
}

impl Animator for ManualAnimator {
    fn play(&mut self, request: AnimationRequest, done: CompletionSignal) -> Result<(), AnimationError> {
        let mut state = self.state.borrow_mut();
        if let Some(error) = state.failure.clone() {
            return Err(error);
        }
        state.requests.push(request);
        state.in_flight.push(done);
        Ok(())
    }
}
