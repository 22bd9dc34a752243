//! Property-based tests for navigation invariants

mod stack_invariants;
