//! Random operation sequences against the controller

use backstack::memory::{Journal, LifecycleEvent, ManualAnimator, MemoryResolver, MemoryUnit, RecordingHooks};
use backstack::transaction::{Notification, NotificationKind};
use backstack::{ContainerId, NavigationController, Tag, Unit};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};

const CONTAINERS: u32 = 3;
const TAGS: &[&str] = &["A", "B", "C", "D", "E"];

#[derive(Debug, Clone)]
enum Op {
    Add(u32, usize),
    AddMultiple(u32, Vec<usize>),
    Replace(u32, usize, bool),
    Back(u32, Option<usize>),
    Pop(u32),
    PopAll(u32),
    Remove(u32, usize),
    Complete,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let container = 0..CONTAINERS;
    let tag = 0..TAGS.len();
    prop_oneof![
        (container.clone(), tag.clone()).prop_map(|(c, t)| Op::Add(c, t)),
        (container.clone(), prop::collection::vec(tag.clone(), 0..6)).prop_map(|(c, ts)| Op::AddMultiple(c, ts)),
        (container.clone(), tag.clone(), any::<bool>()).prop_map(|(c, t, clear)| Op::Replace(c, t, clear)),
        (container.clone(), prop::option::of(tag.clone())).prop_map(|(c, t)| Op::Back(c, t)),
        container.clone().prop_map(Op::Pop),
        container.clone().prop_map(Op::PopAll),
        (container, tag).prop_map(|(c, t)| Op::Remove(c, t)),
        Just(Op::Complete),
    ]
}

/// Every unit handed to the controller, with its own journal.
#[derive(Default)]
struct Built(Vec<Journal>);

impl Built {
    /// Units with presentations, and one that embeds the next container, so
    /// deferral and cascading both get exercised.
    fn unit(&mut self, container: u32, tag: usize) -> Box<dyn Unit> {
        let journal = Journal::new();
        let mut unit = MemoryUnit::new(TAGS[tag]).with_journal(&journal);
        if tag % 2 == 0 {
            unit = unit.presented();
        }
        if tag == 2 && container + 1 < CONTAINERS {
            unit = unit.embedding(ContainerId(container + 1));
        }
        self.0.push(journal);
        Box::new(unit)
    }

    /// Instances attached and not yet detached, counted per container and tag.
    fn live(&self) -> BTreeMap<(ContainerId, Tag), usize> {
        let mut live = BTreeMap::new();
        for journal in &self.0 {
            let events = journal.events();
            let attached = events.iter().find_map(|event| match event {
                LifecycleEvent::Attach(tag, container) => Some((*container, tag.clone())),
                _ => None,
            });
            let detached = events.iter().any(|event| matches!(event, LifecycleEvent::Detach(_)));
            if let (Some(key), false) = (attached, detached) {
                *live.entry(key).or_insert(0) += 1;
            }
        }
        live
    }
}

type Nav = NavigationController<MemoryResolver, RecordingHooks>;

fn apply(nav: &mut Nav, animator: &ManualAnimator, built: &mut Built, op: &Op) {
    match op {
        Op::Add(c, t) => nav.add(ContainerId(*c), built.unit(*c, *t)),
        Op::AddMultiple(c, ts) => {
            let units = ts.iter().map(|t| built.unit(*c, *t)).collect();
            nav.add_multiple(ContainerId(*c), units);
        }
        Op::Replace(c, t, clear) => nav.replace(ContainerId(*c), built.unit(*c, *t), *clear),
        Op::Back(c, t) => nav.back(ContainerId(*c), t.map(|t| TAGS[t])),
        Op::Pop(c) => nav.pop(ContainerId(*c)),
        Op::PopAll(c) => nav.pop_all(ContainerId(*c)),
        Op::Remove(c, t) => nav.remove(ContainerId(*c), TAGS[*t]),
        Op::Complete => {
            animator.finish_all();
            nav.process_animations();
        }
    }
}

fn settle(nav: &mut Nav, animator: &ManualAnimator) {
    while animator.finish_all() > 0 {
        nav.process_animations();
    }
    nav.process_animations();
}

fn registry_entries(nav: &Nav) -> Vec<(ContainerId, Tag)> {
    let mut entries: Vec<(ContainerId, Tag)> = nav
        .registry()
        .container_ids()
        .into_iter()
        .flat_map(|c| nav.stack(c).iter().map(move |t| (c, t.clone())).collect::<Vec<_>>())
        .collect();
    entries.sort();
    entries
}

proptest! {
    #[test]
    fn no_container_ever_holds_a_duplicate_tag(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let animator = ManualAnimator::new();
        let mut built = Built::default();
        let mut nav = NavigationController::new(MemoryResolver::new(), RecordingHooks::new())
            .with_animator(animator.clone());

        for op in &ops {
            apply(&mut nav, &animator, &mut built, op);
            for container in nav.registry().container_ids() {
                let stack = nav.stack(container);
                let unique: HashSet<&Tag> = stack.iter().collect();
                prop_assert_eq!(unique.len(), stack.len(), "duplicate in {} after {:?}", container, op);
            }
        }
    }

    #[test]
    fn settled_host_matches_registry(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let animator = ManualAnimator::new();
        let mut built = Built::default();
        let mut nav = NavigationController::new(MemoryResolver::new(), RecordingHooks::new())
            .with_animator(animator.clone());

        for op in &ops {
            apply(&mut nav, &animator, &mut built, op);
        }
        settle(&mut nav, &animator);

        let expected = registry_entries(&nav);
        prop_assert_eq!(nav.resolver().attached(), expected.clone());
        prop_assert_eq!(nav.pending_animations(), 0);

        // Exactly one live instance per entry; every other instance was detached.
        let live = built.live();
        for (key, count) in &live {
            prop_assert_eq!(*count, 1, "{:?} has {} live instances", key, count);
        }
        prop_assert_eq!(live.into_keys().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn notifications_replay_to_final_stacks(ops in prop::collection::vec(op_strategy(), 1..40)) {
        // Removals parked behind exit animations land between later operations,
        // yet replaying notifications in order must still reconstruct the tag
        // sets once everything has settled.
        let animator = ManualAnimator::new();
        let mut built = Built::default();
        let mut nav = NavigationController::new(MemoryResolver::new(), RecordingHooks::new())
            .with_animator(animator.clone());
        for op in &ops {
            apply(&mut nav, &animator, &mut built, op);
        }
        settle(&mut nav, &animator);

        let mut replayed: BTreeMap<ContainerId, HashSet<Tag>> = BTreeMap::new();
        for Notification { container, kind, tags } in nav.hooks().events() {
            let set = replayed.entry(container).or_default();
            for tag in tags {
                match kind {
                    NotificationKind::Added => { set.insert(tag); }
                    NotificationKind::Removed => { set.remove(&tag); }
                }
            }
        }
        for container in nav.registry().container_ids() {
            let actual: HashSet<Tag> = nav.stack(container).iter().cloned().collect();
            let notified = replayed.remove(&container).unwrap_or_default();
            if actual != notified {
                // Cascaded children are cleared without notifications.
                prop_assert!(container.0 > 0);
                prop_assert!(actual.is_subset(&notified));
            }
        }
        // Containers never registered must not have been left non-empty.
        for (container, notified) in replayed {
            prop_assert!(container.0 > 0 || notified.is_empty(), "{} left {:?}", container, notified);
        }
    }
}
