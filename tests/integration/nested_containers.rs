//! Units that embed containers of their own

use super::test_utils::{controller, tags, unit};
use backstack::memory::MemoryUnit;
use backstack::transaction::Notification;
use backstack::ContainerId;

const MAIN: ContainerId = ContainerId(1);
const TABS: ContainerId = ContainerId(2);
const INNER: ContainerId = ContainerId(3);

#[test]
fn test_removing_owner_clears_nested_stack() {
    let mut nav = controller();
    nav.add(MAIN, unit("Home"));
    nav.add(MAIN, Box::new(MemoryUnit::new("Tabs").embedding(TABS)));
    nav.add_multiple(TABS, vec![unit("X"), unit("Y")]);
    nav.hooks_mut().clear();

    nav.remove(MAIN, "Tabs");

    assert!(nav.stack(TABS).is_empty());
    assert_eq!(nav.stack(MAIN), tags(&["Home"]).as_slice());
    assert_eq!(nav.resolver().len(), 1);
    // Only the owner's container reports; nested children go quietly.
    assert_eq!(nav.hooks().events(), vec![Notification::removed(MAIN, tags(&["Tabs"]))]);
}

#[test]
fn test_replace_tears_down_previous_owner() {
    let mut nav = controller();
    nav.add(MAIN, unit("Home"));
    nav.add(MAIN, Box::new(MemoryUnit::new("Tabs").embedding(TABS)));
    nav.add(TABS, Box::new(MemoryUnit::new("Feed").embedding(INNER)));
    nav.add(INNER, unit("Story"));

    nav.replace(MAIN, unit("Settings"), false);

    assert_eq!(nav.stack(MAIN), tags(&["Home", "Settings"]).as_slice());
    assert!(nav.stack(TABS).is_empty());
    assert!(nav.stack(INNER).is_empty());
    assert!(!nav.resolver().contains(INNER, "Story"));
}

#[test]
fn test_nested_container_can_be_reused_after_cleanup() {
    let mut nav = controller();
    nav.add(MAIN, unit("Home"));
    nav.add(MAIN, Box::new(MemoryUnit::new("Tabs").embedding(TABS)));
    nav.add(TABS, unit("X"));
    nav.back(MAIN, None);

    nav.add(MAIN, Box::new(MemoryUnit::new("Tabs").embedding(TABS)));
    nav.add(TABS, unit("X"));

    assert_eq!(nav.stack(TABS), tags(&["X"]).as_slice());
    assert!(nav.resolver().contains(TABS, "X"));
}
