//! Construction parameters for a state machine.

use crate::core::{Hook, StateKey, TransitionContext};
use std::fmt;
use std::sync::Arc;

/// How `transition` interprets its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FsmKind {
    /// Named transitions looked up in the transition table.
    #[default]
    Simple,

    /// No transition table; the argument names the target state.
    Anonymous,
}

/// What to do when a named transition does not start at the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Return success without moving or firing any hook.
    #[default]
    Ignore,

    /// Fail with `FsmError::InvalidSourceState`.
    Reject,
}

/// Parameters used to construct an [`Fsm`](super::Fsm).
///
/// The shared hooks, when set, are attached to every declared state.
///
/// # Example
///
/// ```rust
/// use keyfsm::engine::{Fsm, FsmConfig, MismatchPolicy};
///
/// let config = FsmConfig::new(vec!["foo", "bar", "baz"], "bar")
///     .with_on_enter(|ctx| println!("entering {:?}", ctx.to))
///     .with_mismatch_policy(MismatchPolicy::Reject);
///
/// let fsm = Fsm::new(config).unwrap();
/// assert_eq!(fsm.initial_state(), "bar");
/// ```
pub struct FsmConfig<K: StateKey> {
    pub states: Vec<K>,
    pub initial: K,
    pub on_enter: Option<Hook<K>>,
    pub on_exit: Option<Hook<K>>,
    pub kind: FsmKind,
    pub on_mismatch: MismatchPolicy,
}

impl<K: StateKey> FsmConfig<K> {
    pub fn new(states: impl IntoIterator<Item = K>, initial: K) -> Self {
        Self {
            states: states.into_iter().collect(),
            initial,
            on_enter: None,
            on_exit: None,
            kind: FsmKind::Simple,
            on_mismatch: MismatchPolicy::Ignore,
        }
    }

    pub fn with_on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext<K>) + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(hook));
        self
    }

    pub fn with_on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext<K>) + Send + Sync + 'static,
    {
        self.on_exit = Some(Arc::new(hook));
        self
    }

    pub fn with_kind(mut self, kind: FsmKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.on_mismatch = policy;
        self
    }
}

impl<K: StateKey> fmt::Debug for FsmConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmConfig")
            .field("states", &self.states)
            .field("initial", &self.initial)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("kind", &self.kind)
            .field("on_mismatch", &self.on_mismatch)
            .finish()
    }
}
