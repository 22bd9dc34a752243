//! Animation coordination.
//!
//! The host's [`Animator`] plays transitions; the controller never waits for
//! them. Each started animation is paired with a [`Continuation`] that is parked
//! under a ticket. When the host finishes playback it fires the
//! [`CompletionSignal`] it was handed, which sends the ticket back over a
//! channel. The controller drains that channel on its own loop and runs the
//! parked continuations, so completion never re-enters the controller from
//! inside the animator.

use crate::error::AnimationError;
use crate::transaction::Transaction;
use crate::types::{Animation, AnimationId, ContainerId, Tag, TransitionPhase};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{debug, warn};

/// Animation ids substituted for [`Animation::Default`], per phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAnimations {
    #[serde(default = "default_add_in")]
    pub add_in: String,
    #[serde(default = "default_add_out")]
    pub add_out: String,
    #[serde(default = "default_back_in")]
    pub back_in: String,
    #[serde(default = "default_back_out")]
    pub back_out: String,
}

fn default_add_in() -> String {
    "slide_in_right".to_string()
}

fn default_add_out() -> String {
    "slide_out_left".to_string()
}

fn default_back_in() -> String {
    "slide_in_left".to_string()
}

fn default_back_out() -> String {
    "slide_out_right".to_string()
}

impl Default for DefaultAnimations {
    fn default() -> Self {
        Self {
            add_in: default_add_in(),
            add_out: default_add_out(),
            back_in: default_back_in(),
            back_out: default_back_out(),
        }
    }
}

impl DefaultAnimations {
    pub fn for_phase(&self, phase: TransitionPhase) -> AnimationId {
        let name = match phase {
            TransitionPhase::EnterIn => &self.add_in,
            TransitionPhase::EnterOut => &self.add_out,
            TransitionPhase::BackIn => &self.back_in,
            TransitionPhase::BackOut => &self.back_out,
        };
        AnimationId::new(name.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        for (slot, value) in [
            ("add_in", &self.add_in),
            ("add_out", &self.add_out),
            ("back_in", &self.back_in),
            ("back_out", &self.back_out),
        ] {
            if value.trim().is_empty() {
                return Err(format!("Default animation '{}' cannot be empty", slot));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationTicket(pub u64);

impl fmt::Display for AnimationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim-{}", self.0)
    }
}

/// One transition for the host to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRequest {
    pub ticket: AnimationTicket,
    pub container: ContainerId,
    pub tag: Tag,
    pub phase: TransitionPhase,
    pub animation: AnimationId,
}

/// Handed to the animator with each request; fire it when playback ends.
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    ticket: AnimationTicket,
    sender: Sender<AnimationTicket>,
}

impl CompletionSignal {
    pub fn ticket(&self) -> AnimationTicket {
        self.ticket
    }

    /// Report completion. Safe to call after the controller is gone.
    pub fn complete(self) {
        let _ = self.sender.send(self.ticket);
    }
}

/// Host port that plays transitions on unit presentations.
pub trait Animator {
    /// Start playback. Must not block; an error means nothing will play and
    /// `done` will never be fired.
    fn play(&mut self, request: AnimationRequest, done: CompletionSignal) -> Result<(), AnimationError>;
}

/// Animator that finishes every transition as soon as it starts.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn play(&mut self, _request: AnimationRequest, done: CompletionSignal) -> Result<(), AnimationError> {
        done.complete();
        Ok(())
    }
}

/// Work to run once an animation ends.
#[derive(Debug)]
pub enum Continuation {
    /// Hide a unit that was covered by a newly added one.
    Hide { container: ContainerId, tag: Tag },
    /// Commit a removal that was held back for its exit animation.
    Commit(Transaction),
    Nothing,
}

#[derive(Debug)]
pub enum StartOutcome {
    Started(AnimationTicket),
    /// Nothing will play; the caller must run the continuation itself.
    NotStarted(Continuation),
}

pub struct AnimationCoordinator {
    animator: Option<Box<dyn Animator>>,
    defaults: DefaultAnimations,
    next_ticket: u64,
    pending: HashMap<AnimationTicket, Continuation>,
    sender: Sender<AnimationTicket>,
    receiver: Receiver<AnimationTicket>,
}

impl Default for AnimationCoordinator {
    fn default() -> Self {
        Self::new(None, DefaultAnimations::default())
    }
}

impl AnimationCoordinator {
    pub fn new(animator: Option<Box<dyn Animator>>, defaults: DefaultAnimations) -> Self {
        let (sender, receiver) = channel();
        Self {
            animator,
            defaults,
            next_ticket: 1,
            pending: HashMap::new(),
            sender,
            receiver,
        }
    }

    pub fn set_animator(&mut self, animator: Box<dyn Animator>) {
        self.animator = Some(animator);
    }

    pub fn defaults(&self) -> &DefaultAnimations {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: DefaultAnimations) {
        self.defaults = defaults;
    }

    pub fn resolve(&self, animation: &Animation, phase: TransitionPhase) -> AnimationId {
        match animation {
            Animation::Default => self.defaults.for_phase(phase),
            Animation::Custom(id) => id.clone(),
        }
    }

    /// Ask the animator to play a transition and park `continuation` until it ends.
    pub fn start(
        &mut self,
        container: ContainerId,
        tag: &str,
        phase: TransitionPhase,
        animation: &Animation,
        continuation: Continuation,
    ) -> StartOutcome {
        let animation = self.resolve(animation, phase);
        let Some(animator) = self.animator.as_mut() else {
            debug!(container = %container, tag, phase = phase.as_str(), "No animator installed");
            return StartOutcome::NotStarted(continuation);
        };

        let ticket = AnimationTicket(self.next_ticket);
        self.next_ticket += 1;
        let request = AnimationRequest {
            ticket,
            container,
            tag: tag.to_string(),
            phase,
            animation,
        };
        let done = CompletionSignal {
            ticket,
            sender: self.sender.clone(),
        };

        match animator.play(request, done) {
            Ok(()) => {
                debug!(container = %container, tag, phase = phase.as_str(), %ticket, "Animation started");
                self.pending.insert(ticket, continuation);
                StartOutcome::Started(ticket)
            }
            Err(e) => {
                warn!(container = %container, tag, phase = phase.as_str(), error = %e, "Animation failed, continuing without it");
                StartOutcome::NotStarted(continuation)
            }
        }
    }

    /// Take the continuation of one ticket, if it is still pending.
    pub fn complete(&mut self, ticket: AnimationTicket) -> Option<Continuation> {
        self.pending.remove(&ticket)
    }

    /// Pull a parked REMOVE of `tag` out of every pending commit. Returns
    /// whether any was found; the rest of each transaction stays parked.
    pub fn take_pending_removal(&mut self, container: ContainerId, tag: &str) -> bool {
        let mut found = false;
        for continuation in self.pending.values_mut() {
            if let Continuation::Commit(transaction) = continuation {
                found |= transaction.take_remove(container, tag);
            }
        }
        found
    }

    /// Drain every completion the animator has reported so far, in arrival order.
    pub fn drain_completed(&mut self) -> Vec<Continuation> {
        let mut ready = Vec::new();
        while let Ok(ticket) = self.receiver.try_recv() {
            match self.pending.remove(&ticket) {
                Some(continuation) => ready.push(continuation),
                None => debug!(%ticket, "Completion for unknown or already handled animation"),
            }
        }
        ready
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_tickets(&self) -> Vec<AnimationTicket> {
        let mut tickets: Vec<_> = self.pending.keys().copied().collect();
        tickets.sort();
        tickets
    }
}
