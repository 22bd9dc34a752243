//! Back-navigation: walk the stack from the top, stage removals, and commit
//! them either at once or after the outgoing top's exit animation.

use super::NavigationController;
use crate::animation::{Continuation, StartOutcome};
use crate::hooks::LifecycleHooks;
use crate::transaction::{Notification, Transaction, TransactionBuilder};
use crate::types::{ContainerId, Tag, TransitionPhase};
use crate::unit::UnitResolver;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BackTarget<'a> {
    /// Remove everything above the root entry.
    Root,
    /// Remove everything above this tag; the tag itself stays.
    Tag(&'a str),
    /// Remove the top entry only.
    Top,
}

impl<R: UnitResolver, H: LifecycleHooks> NavigationController<R, H> {
    pub(crate) fn navigate_back(&mut self, container: ContainerId, target: BackTarget<'_>) {
        let stack = self.registry.stack(container).to_vec();
        if stack.len() <= 1 && !matches!(target, BackTarget::Tag(_)) {
            debug!(container = %container, "Back on last unit");
            self.hooks.on_last_unit_back(container);
            return;
        }

        let previous_top = stack.last().cloned();
        let mut builder = TransactionBuilder::new();
        let mut removed: Vec<Tag> = Vec::new();

        // The bottom-most entry is never removed by back-navigation.
        for tag in stack.iter().skip(1).rev() {
            if let BackTarget::Tag(to_tag) = target {
                if tag == to_tag {
                    break;
                }
            }
            self.cascade_nested(container, tag, &mut builder);
            match self.resolver.resolve(container, tag) {
                Some(unit) => unit.pause(),
                None => warn!(container = %container, tag = %tag, "Cannot resolve unit during back, dropping its tag"),
            }
            self.registry.remove(container, tag);
            builder.remove(container, tag.clone());
            removed.push(tag.clone());
            if target == BackTarget::Top {
                break;
            }
        }

        if removed.is_empty() {
            debug!(container = %container, ?target, "Back target already on top");
            return;
        }

        debug!(container = %container, removed = ?removed, "Back-navigating");
        let transaction = builder
            .build()
            .with_notification(Notification::removed(container, removed));
        match previous_top {
            Some(outgoing) => self.commit_after_exit(container, &outgoing, transaction),
            None => self.commit_now(transaction),
        }
        self.reveal_top(container);
    }

    /// Defer the commit until `outgoing` finishes its back-out transition, or
    /// commit at once when it has nothing to animate.
    fn commit_after_exit(&mut self, container: ContainerId, outgoing: &str, transaction: Transaction) {
        let animation = match self.resolver.resolve(container, outgoing) {
            Some(unit) if unit.is_presented() => unit.back_out_animation(),
            _ => {
                self.commit_now(transaction);
                return;
            }
        };
        match self.animations.start(
            container,
            outgoing,
            TransitionPhase::BackOut,
            &animation,
            Continuation::Commit(transaction),
        ) {
            StartOutcome::Started(ticket) => {
                debug!(container = %container, tag = outgoing, %ticket, "Removal deferred until exit animation ends");
            }
            StartOutcome::NotStarted(continuation) => self.run_continuation(continuation),
        }
    }

    /// Bring the new top back: show it, resume it, play its back-in transition.
    fn reveal_top(&mut self, container: ContainerId) {
        let Some(top) = self.registry.top(container).cloned() else {
            return;
        };
        let Some(unit) = self.resolver.resolve(container, &top) else {
            warn!(container = %container, tag = %top, "Cannot resolve new top unit");
            return;
        };
        let presented = unit.is_presented();
        let animation = unit.back_in_animation();
        if presented {
            unit.set_visible(true);
        }
        unit.resume();
        if presented {
            self.animations
                .start(container, &top, TransitionPhase::BackIn, &animation, Continuation::Nothing);
        }
    }
}
