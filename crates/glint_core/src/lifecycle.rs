//! Lifecycle state machine
//!
//! Four states, one transition table, and a strict hook order:
//!
//! 1. the outgoing state's exit hook runs to completion,
//! 2. the current-state field is updated,
//! 3. the incoming state's enter hook runs.
//!
//! Hooks are implemented by the owner of the machine and receive the owner's
//! context mutably while the machine itself stays borrowed, so an exit hook
//! has no way to read the new state as current.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    Loading,
    Active,
    Suspended,
    Terminal,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 4] = [
        LifecycleState::Loading,
        LifecycleState::Active,
        LifecycleState::Suspended,
        LifecycleState::Terminal,
    ];

    /// Whether the transition table allows `self -> target`.
    pub fn can_transition_to(self, target: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, target),
            (Loading, Active)
                | (Active, Suspended)
                | (Suspended, Active)
                | (Active, Terminal)
                | (Suspended, Terminal)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == LifecycleState::Terminal
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Loading => "loading",
            LifecycleState::Active => "active",
            LifecycleState::Suspended => "suspended",
            LifecycleState::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// Per-state behaviour supplied by the machine's owner.
pub trait LifecycleHooks {
    fn exit(&mut self, state: LifecycleState);
    fn enter(&mut self, state: LifecycleState, previous: LifecycleState);
}

/// What a transition request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed {
        from: LifecycleState,
        to: LifecycleState,
    },
    /// Already in the requested state.
    Unchanged,
    /// Not in the transition table (includes anything out of `Terminal`).
    Rejected {
        from: LifecycleState,
        to: LifecycleState,
    },
}

impl Transition {
    pub fn is_changed(&self) -> bool {
        matches!(self, Transition::Changed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct LifecycleMachine {
    current: LifecycleState,
    previous: Option<LifecycleState>,
}

impl LifecycleMachine {
    pub fn new() -> Self {
        Self {
            current: LifecycleState::Loading,
            previous: None,
        }
    }

    #[inline]
    pub fn current(&self) -> LifecycleState {
        self.current
    }

    #[inline]
    pub fn previous(&self) -> Option<LifecycleState> {
        self.previous
    }

    /// Move to `target` if the table allows it, running the hooks in order.
    pub fn request<H>(&mut self, target: LifecycleState, hooks: &mut H) -> Transition
    where
        H: LifecycleHooks + ?Sized,
    {
        let from = self.current;
        if from == target {
            return Transition::Unchanged;
        }
        if !from.can_transition_to(target) {
            tracing::debug!(%from, to = %target, "ignored lifecycle transition");
            return Transition::Rejected { from, to: target };
        }

        hooks.exit(from);
        self.previous = Some(from);
        self.current = target;
        hooks.enter(target, from);

        tracing::info!(%from, to = %target, "lifecycle transition");
        Transition::Changed { from, to: target }
    }
}

impl Default for LifecycleMachine {
    fn default() -> Self {
        Self::new()
    }
}
