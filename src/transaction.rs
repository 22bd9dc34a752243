//! Transactions: staged add/remove batches committed against the host.
//!
//! Tag bookkeeping in the [`ContainerRegistry`] happens synchronously when an
//! operation is staged. A transaction only carries the unit side of the
//! change (attach/detach) plus the notification to fire once it lands, so it
//! can be committed immediately or parked until an exit animation finishes.

use crate::hooks::LifecycleHooks;
use crate::registry::ContainerRegistry;
use crate::types::{ContainerId, Tag};
use crate::unit::{Unit, UnitResolver};
use std::fmt;
use tracing::{debug, info, trace};

pub enum TransactionOp {
    Add {
        container: ContainerId,
        tag: Tag,
        unit: Box<dyn Unit>,
    },
    Remove {
        container: ContainerId,
        tag: Tag,
    },
}

impl fmt::Debug for TransactionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionOp::Add { container, tag, .. } => f
                .debug_struct("Add")
                .field("container", container)
                .field("tag", tag)
                .finish_non_exhaustive(),
            TransactionOp::Remove { container, tag } => f
                .debug_struct("Remove")
                .field("container", container)
                .field("tag", tag)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Added,
    Removed,
}

/// Host notification fired after a transaction commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub container: ContainerId,
    pub kind: NotificationKind,
    pub tags: Vec<Tag>,
}

impl Notification {
    pub fn added(container: ContainerId, tags: Vec<Tag>) -> Self {
        Self {
            container,
            kind: NotificationKind::Added,
            tags,
        }
    }

    pub fn removed(container: ContainerId, tags: Vec<Tag>) -> Self {
        Self {
            container,
            kind: NotificationKind::Removed,
            tags,
        }
    }

    fn deliver<H: LifecycleHooks + ?Sized>(&self, hooks: &mut H) {
        match self.kind {
            NotificationKind::Added => {
                info!(container = %self.container, tags = ?self.tags, "Units added");
                hooks.on_unit_added(self.container, &self.tags);
            }
            NotificationKind::Removed => {
                info!(container = %self.container, tags = ?self.tags, "Units removed");
                hooks.on_unit_removed(self.container, &self.tags);
            }
        }
    }
}

/// What a commit actually did to the host.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub attached: Vec<(ContainerId, Tag)>,
    pub detached: Vec<(ContainerId, Tag)>,
    /// REMOVEs skipped because the tag was absent or re-added since staging.
    pub skipped: Vec<(ContainerId, Tag)>,
    /// ADDs that found an older instance still attached under the same tag.
    pub replaced: Vec<(ContainerId, Tag)>,
}

/// Collects operations for one atomic batch.
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    ops: Vec<TransactionOp>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, container: ContainerId, tag: impl Into<Tag>, unit: Box<dyn Unit>) -> &mut Self {
        self.ops.push(TransactionOp::Add {
            container,
            tag: tag.into(),
            unit,
        });
        self
    }

    pub fn remove(&mut self, container: ContainerId, tag: impl Into<Tag>) -> &mut Self {
        self.ops.push(TransactionOp::Remove {
            container,
            tag: tag.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn build(self) -> Transaction {
        Transaction {
            ops: self.ops,
            notification: None,
        }
    }
}

#[derive(Debug)]
pub struct Transaction {
    ops: Vec<TransactionOp>,
    notification: Option<Notification>,
}

impl Transaction {
    /// Attach a notification to fire after the commit. Empty tag lists are dropped.
    pub fn with_notification(mut self, notification: Notification) -> Self {
        if !notification.tags.is_empty() {
            self.notification = Some(notification);
        }
        self
    }

    pub fn ops(&self) -> &[TransactionOp] {
        &self.ops
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Pull a staged REMOVE of `tag` out of this transaction, together with
    /// its entry in the removal notification. Returns whether one was staged.
    pub fn take_remove(&mut self, container: ContainerId, tag: &str) -> bool {
        let before = self.ops.len();
        self.ops.retain(|op| {
            !matches!(op, TransactionOp::Remove { container: c, tag: t } if *c == container && t == tag)
        });
        if self.ops.len() == before {
            return false;
        }

        let emptied = match self.notification.as_mut() {
            Some(n) if n.kind == NotificationKind::Removed && n.container == container => {
                n.tags.retain(|t| t != tag);
                n.tags.is_empty()
            }
            _ => false,
        };
        if emptied {
            self.notification = None;
        }
        true
    }

    /// Apply every operation in order, then fire the notification.
    ///
    /// A REMOVE whose tag is back in its container's stack belongs to a newer
    /// request and is skipped, and the tag is left out of the removal
    /// notification. An ADD over a still-attached instance detaches that
    /// instance first, so every attached unit sees exactly one `detach`.
    pub fn commit<R, H>(self, registry: &ContainerRegistry, resolver: &mut R, hooks: &mut H) -> CommitReport
    where
        R: UnitResolver + ?Sized,
        H: LifecycleHooks + ?Sized,
    {
        let mut report = CommitReport::default();
        let mut stale: Vec<(ContainerId, Tag)> = Vec::new();
        for op in self.ops {
            match op {
                TransactionOp::Add {
                    container,
                    tag,
                    mut unit,
                } => {
                    if let Some(mut previous) = resolver.detach(container, &tag) {
                        previous.detach();
                        debug!(container = %container, tag = %tag, "Detached older instance attached under the same tag");
                        report.replaced.push((container, tag.clone()));
                    }
                    unit.attach(container);
                    resolver.attach(container, &tag, unit);
                    trace!(container = %container, tag = %tag, "Attached unit");
                    report.attached.push((container, tag));
                }
                TransactionOp::Remove { container, tag } => {
                    if registry.contains(container, &tag) {
                        debug!(container = %container, tag = %tag, "Skipping stale remove, tag was re-added");
                        stale.push((container, tag.clone()));
                        report.skipped.push((container, tag));
                        continue;
                    }
                    match resolver.detach(container, &tag) {
                        Some(mut unit) => {
                            unit.detach();
                            trace!(container = %container, tag = %tag, "Detached unit");
                            report.detached.push((container, tag));
                        }
                        None => report.skipped.push((container, tag)),
                    }
                }
            }
        }
        if let Some(mut notification) = self.notification {
            if notification.kind == NotificationKind::Removed {
                let container = notification.container;
                notification
                    .tags
                    .retain(|tag| !stale.iter().any(|(c, t)| *c == container && t == tag));
            }
            if !notification.tags.is_empty() {
                notification.deliver(hooks);
            }
        }
        report
    }
}
