//! Contexts handed to handlers and hooks during a transition attempt.

use super::key::StateKey;
use super::state::State;
use std::collections::HashMap;

/// Snapshot of the transition being attempted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionContext<K> {
    /// Name the transition was invoked with.
    pub name: K,
    pub from: K,
    pub to: K,
}

/// Context passed to a transition handler.
///
/// Built fresh for every attempt. The state snapshots are identity-only
/// copies of the state current when the attempt started, and the registry
/// handle is read-only, so a handler can inspect the machine but never
/// reach a live hook or mutate anything.
///
/// # Example
///
/// ```rust
/// use keyfsm::engine::{Fsm, FsmConfig};
///
/// let fsm = Fsm::new(FsmConfig::new(vec!["locked", "open"], "locked")).unwrap();
/// fsm.add_transition_fn("unlock", "locked", "open", |ctx| {
///     assert_eq!(ctx.current_state().key(), &"locked");
///     assert!(ctx.get_state(&"open").is_some());
///     assert!(ctx.get_state(&"missing").is_none());
///     Ok(())
/// })
/// .unwrap();
///
/// fsm.initialize().unwrap();
/// fsm.transition(&"unlock").unwrap();
/// assert_eq!(fsm.current_state(), Some("open"));
/// ```
pub struct FsmContext<'a, K: StateKey> {
    transition: TransitionContext<K>,
    initial_state: State<K>,
    current_state: State<K>,
    states: &'a HashMap<K, State<K>>,
}

impl<'a, K: StateKey> FsmContext<'a, K> {
    pub(crate) fn new(
        current: &State<K>,
        states: &'a HashMap<K, State<K>>,
        transition: TransitionContext<K>,
    ) -> Self {
        Self {
            transition,
            initial_state: current.identity(),
            current_state: current.identity(),
            states,
        }
    }

    pub fn transition(&self) -> &TransitionContext<K> {
        &self.transition
    }

    /// State the machine was in when the attempt started.
    pub fn initial_state(&self) -> &State<K> {
        &self.initial_state
    }

    /// State the machine is in now. Identical to `initial_state` while the
    /// handler runs, since nothing is committed until it returns.
    pub fn current_state(&self) -> &State<K> {
        &self.current_state
    }

    /// Look up a declared state by key.
    ///
    /// Returns an identity-only copy, or `None` for an undeclared key.
    pub fn get_state(&self, key: &K) -> Option<State<K>> {
        self.states.get(key).map(State::identity)
    }

    pub fn contains_state(&self, key: &K) -> bool {
        self.states.contains_key(key)
    }

    /// Keys of every declared state, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &K> + '_ {
        self.states.keys()
    }
}
