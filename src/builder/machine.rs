//! Builder for constructing state machines.

use crate::builder::error::{BuildError, ConfigIssue};
use crate::core::{FsmContext, HandlerError, Hook, State, StateKey, Transition, TransitionContext};
use crate::engine::{Fsm, FsmKind, MismatchPolicy};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state machines with a fluent API.
///
/// Shared hooks set with `on_enter`/`on_exit` apply to every state. A state
/// declared with [`declare`](Self::declare) keeps its own hooks and falls
/// back to the shared ones only where it has none.
///
/// # Example
///
/// ```rust
/// use keyfsm::builder::FsmBuilder;
///
/// let fsm = FsmBuilder::new()
///     .states(["foo", "bar", "baz"])
///     .initial("bar")
///     .transition("yug", "bar", "foo")
///     .guarded("back", "foo", "bar", |_ctx| Ok(()))
///     .build()
///     .unwrap();
///
/// fsm.initialize().unwrap();
/// fsm.transition(&"yug").unwrap();
/// assert_eq!(fsm.current_state(), Some("foo"));
/// ```
pub struct FsmBuilder<K: StateKey> {
    states: Vec<K>,
    declared: Vec<State<K>>,
    initial: Option<K>,
    on_enter: Option<Hook<K>>,
    on_exit: Option<Hook<K>>,
    transitions: Vec<Transition<K>>,
    kind: FsmKind,
    on_mismatch: MismatchPolicy,
}

impl<K: StateKey> FsmBuilder<K> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            declared: Vec::new(),
            initial: None,
            on_enter: None,
            on_exit: None,
            transitions: Vec::new(),
            kind: FsmKind::Simple,
            on_mismatch: MismatchPolicy::Ignore,
        }
    }

    /// Declare a state.
    pub fn state(mut self, key: K) -> Self {
        self.states.push(key);
        self
    }

    /// Declare several states at once.
    pub fn states(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.states.extend(keys);
        self
    }

    /// Declare a state carrying its own hooks.
    pub fn declare(mut self, state: State<K>) -> Self {
        self.declared.push(state);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, key: K) -> Self {
        self.initial = Some(key);
        self
    }

    /// Set the enter hook shared by all states.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext<K>) + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(hook));
        self
    }

    /// Set the exit hook shared by all states.
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext<K>) + Send + Sync + 'static,
    {
        self.on_exit = Some(Arc::new(hook));
        self
    }

    pub fn kind(mut self, kind: FsmKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn on_mismatch(mut self, policy: MismatchPolicy) -> Self {
        self.on_mismatch = policy;
        self
    }

    /// Add a transition without a handler.
    pub fn transition(self, name: K, from: K, to: K) -> Self {
        self.add_transition(Transition::new(name, from, to))
    }

    /// Add a transition gated by a handler.
    pub fn guarded<F>(self, name: K, from: K, to: K, handler: F) -> Self
    where
        F: Fn(&FsmContext<'_, K>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.add_transition(Transition::new(name, from, to).with_handler(handler))
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<K>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<K>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Check the configuration, accumulating ALL issues.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigIssue<K>>> {
        let declared: HashSet<&K> = self
            .states
            .iter()
            .chain(self.declared.iter().map(State::key))
            .collect();
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigIssue<K>>>> = Vec::new();

        let initial = match &self.initial {
            None => Validation::fail(ConfigIssue::MissingInitialState),
            Some(initial) if !declared.contains(initial) => {
                Validation::fail(ConfigIssue::InitialStateNotFound {
                    initial: initial.clone(),
                })
            }
            Some(_) => Validation::success(()),
        };
        checks.push(initial);

        for transition in &self.transitions {
            if self.kind == FsmKind::Anonymous {
                checks.push(Validation::fail(ConfigIssue::AnonymousTransition {
                    transition: transition.name.clone(),
                }));
                continue;
            }

            for endpoint in [&transition.from, &transition.to] {
                if !declared.contains(endpoint) {
                    checks.push(Validation::fail(ConfigIssue::UnknownState {
                        transition: transition.name.clone(),
                        state: endpoint.clone(),
                    }));
                }
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the state machine.
    ///
    /// The returned machine has every transition registered but is not yet
    /// initialized.
    pub fn build(self) -> Result<Fsm<K>, BuildError<K>> {
        if let Validation::Failure(issues) = self.validate() {
            return Err(BuildError::Invalid(issues.iter().cloned().collect()));
        }
        let Some(initial) = self.initial else {
            return Err(BuildError::Invalid(vec![ConfigIssue::MissingInitialState]));
        };

        let mut states: HashMap<K, State<K>> = self
            .states
            .into_iter()
            .map(|key| {
                let state =
                    State::with_hooks(key.clone(), self.on_enter.clone(), self.on_exit.clone());
                (key, state)
            })
            .collect();
        for state in self.declared {
            let (key, on_enter, on_exit) = state.into_parts();
            let on_enter = on_enter.or_else(|| self.on_enter.clone());
            let on_exit = on_exit.or_else(|| self.on_exit.clone());
            states.insert(key.clone(), State::with_hooks(key, on_enter, on_exit));
        }

        let fsm = Fsm::from_states(states, initial, self.kind, self.on_mismatch)?;
        for transition in self.transitions {
            let Transition {
                name,
                from,
                to,
                handler,
            } = transition;
            fsm.add_transition(name, from, to, handler)?;
        }

        Ok(fsm)
    }
}

impl<K: StateKey> Default for FsmBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
