//! End-to-end navigation flows through the public controller API

use super::test_utils::{controller, tags, unit};
use backstack::memory::{HookEvent, Journal, LifecycleEvent, MemoryUnit};
use backstack::transaction::Notification;
use backstack::ContainerId;
use std::time::{Duration, Instant};

const MAIN: ContainerId = ContainerId(1);
const SIDE: ContainerId = ContainerId(2);

#[test]
fn test_add_back_add_sequence() {
    let mut nav = controller();
    nav.add(MAIN, unit("A"));
    nav.add(MAIN, unit("B"));
    nav.back(MAIN, None);
    nav.add(MAIN, unit("C"));

    assert_eq!(nav.stack(MAIN), tags(&["A", "C"]).as_slice());
    assert_eq!(
        nav.hooks().events(),
        vec![
            Notification::added(MAIN, tags(&["A"])),
            Notification::added(MAIN, tags(&["B"])),
            Notification::removed(MAIN, tags(&["B"])),
            Notification::added(MAIN, tags(&["C"])),
        ]
    );
    assert_eq!(nav.resolver().len(), 2);
}

#[test]
fn test_add_multiple_deduplicates() {
    let mut nav = controller();
    nav.add_multiple(MAIN, vec![unit("A"), unit("B"), unit("A")]);

    assert_eq!(nav.stack(MAIN), tags(&["A", "B"]).as_slice());
    assert_eq!(nav.hooks().events(), vec![Notification::added(MAIN, tags(&["A", "B"]))]);
}

#[test]
fn test_replace_with_same_single_tag_is_noop() {
    let mut nav = controller();
    nav.add(MAIN, unit("X"));
    let before = nav.hooks().log().to_vec();

    nav.replace(MAIN, unit("X"), false);

    assert_eq!(nav.stack(MAIN), tags(&["X"]).as_slice());
    assert_eq!(nav.hooks().log(), before.as_slice());
}

#[test]
fn test_pop_all_empties_with_one_notification() {
    let mut nav = controller();
    nav.add_multiple(MAIN, vec![unit("A"), unit("B")]);
    nav.add(MAIN, unit("C"));
    nav.hooks_mut().clear();

    nav.pop_all(MAIN);

    assert!(nav.stack(MAIN).is_empty());
    assert_eq!(nav.hooks().events(), vec![Notification::removed(MAIN, tags(&["A", "B", "C"]))]);
}

#[test]
fn test_pop_all_on_empty_container_is_silent() {
    let mut nav = controller();
    nav.pop_all(MAIN);
    assert!(nav.hooks().log().is_empty());
}

#[test]
fn test_remove_twice_is_noop_second_time() {
    let mut nav = controller();
    nav.add_multiple(MAIN, vec![unit("A"), unit("B"), unit("C")]);
    nav.remove(MAIN, "A");
    let after_first = nav.hooks().log().to_vec();

    nav.remove(MAIN, "A");

    assert_eq!(nav.hooks().log(), after_first.as_slice());
    assert_eq!(nav.stack(MAIN), tags(&["B", "C"]).as_slice());
}

#[test]
fn test_back_on_absent_container_reports_last_unit() {
    let mut nav = controller();
    nav.back(SIDE, None);
    assert_eq!(nav.hooks().log(), [HookEvent::LastUnitBack(SIDE)].as_slice());
}

#[test]
fn test_containers_are_independent() {
    let mut nav = controller();
    nav.add_multiple(MAIN, vec![unit("A"), unit("B")]);
    nav.add_multiple(SIDE, vec![unit("A"), unit("B")]);

    nav.back(SIDE, None);

    assert_eq!(nav.stack(MAIN), tags(&["A", "B"]).as_slice());
    assert_eq!(nav.stack(SIDE), tags(&["A"]).as_slice());
    assert_eq!(nav.container_of("B"), Some(MAIN));
}

#[test]
fn test_back_press_is_debounced_and_single_step() {
    let mut nav = controller();
    nav.add_multiple(MAIN, vec![unit("Home"), unit("List"), unit("Detail")]);
    let start = Instant::now();

    assert!(nav.on_back_pressed(start));
    assert!(!nav.on_back_pressed(start + Duration::from_millis(100)));
    // The rejected press still refreshed the window.
    assert!(!nav.on_back_pressed(start + Duration::from_millis(350)));
    assert!(nav.on_back_pressed(start + Duration::from_millis(700)));

    assert_eq!(nav.stack(MAIN), tags(&["Home"]).as_slice());
    assert!(nav.on_back_pressed(start + Duration::from_millis(1100)));
    assert_eq!(nav.hooks().last_unit_backs(), vec![MAIN]);
}

#[test]
fn test_lifecycle_order_for_cover_and_reveal() {
    let journal = Journal::new();
    let mut nav = controller();
    nav.add(MAIN, Box::new(MemoryUnit::new("Home").with_journal(&journal)));
    nav.add(MAIN, Box::new(MemoryUnit::new("Detail").with_journal(&journal)));
    nav.pop(MAIN);

    assert_eq!(
        journal.events(),
        vec![
            LifecycleEvent::Attach("Home".into(), MAIN),
            LifecycleEvent::Pause("Home".into()),
            LifecycleEvent::Attach("Detail".into(), MAIN),
            LifecycleEvent::Pause("Detail".into()),
            LifecycleEvent::Detach("Detail".into()),
            LifecycleEvent::Resume("Home".into()),
        ]
    );
}

#[test]
fn test_teardown_after_finish() {
    let mut nav = controller();
    nav.initialize_units(|nav| {
        nav.add(MAIN, unit("Home"));
        nav.add(SIDE, unit("Panel"));
    });
    nav.finish();
    nav.on_host_pause();

    assert!(nav.resolver().is_empty());
    assert!(nav.is_finished());
    assert!(nav.stack(MAIN).is_empty());
}
