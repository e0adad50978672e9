//! State machine engine.

use crate::core::{
    FsmContext, Handler, HandlerError, State, StateKey, Transition, TransitionContext,
};
use crate::engine::config::{FsmConfig, FsmKind, MismatchPolicy};
use crate::engine::error::FsmError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Fields that change after construction.
struct Inner<K: StateKey> {
    transitions: HashMap<K, Transition<K>>,
    current: Option<K>,
}

/// A finite state machine keyed by `K`.
///
/// The machine moves through three phases: constructed (states and initial
/// state fixed), configured (transitions added), and initialized (current
/// state set, transition table frozen). Only successful transitions change
/// the current state after that.
///
/// # Locking
///
/// One reader-writer lock guards the mutable fields. `initialize`,
/// `add_transition` and `transition` hold the write lock for their whole
/// duration, including every handler and hook they invoke. Getters take the
/// read lock. Concurrent transitions are therefore totally ordered and each
/// one sees every transition that completed before it.
///
/// Handlers and hooks must not call back into the machine that is running
/// them. The lock is not reentrant: such a call deadlocks. They should also
/// return promptly, since every other caller waits on them.
///
/// # Example
///
/// ```rust
/// use keyfsm::engine::{Fsm, FsmConfig};
///
/// let fsm = Fsm::new(FsmConfig::new(vec!["foo", "bar", "baz"], "bar")).unwrap();
/// fsm.add_transition_fn("yug", "bar", "foo", |_ctx| Ok(())).unwrap();
///
/// assert!(fsm.transition(&"yug").is_err());
///
/// fsm.initialize().unwrap();
/// assert_eq!(fsm.current_state(), Some("bar"));
///
/// fsm.transition(&"yug").unwrap();
/// assert_eq!(fsm.current_state(), Some("foo"));
/// ```
pub struct Fsm<K: StateKey> {
    kind: FsmKind,
    on_mismatch: MismatchPolicy,
    states: HashMap<K, State<K>>,
    initial: K,
    inner: RwLock<Inner<K>>,
}

impl<K: StateKey> Fsm<K> {
    /// Create a machine from its configuration.
    ///
    /// Fails if the initial state is not among the declared states.
    pub fn new(config: FsmConfig<K>) -> Result<Self, FsmError<K>> {
        let states = config
            .states
            .into_iter()
            .map(|key| {
                let state = State::with_hooks(
                    key.clone(),
                    config.on_enter.clone(),
                    config.on_exit.clone(),
                );
                (key, state)
            })
            .collect();

        Self::from_states(states, config.initial, config.kind, config.on_mismatch)
    }

    pub(crate) fn from_states(
        states: HashMap<K, State<K>>,
        initial: K,
        kind: FsmKind,
        on_mismatch: MismatchPolicy,
    ) -> Result<Self, FsmError<K>> {
        if !states.contains_key(&initial) {
            return Err(FsmError::InitialStateNotFound { initial });
        }

        tracing::debug!(states = states.len(), initial = ?initial, ?kind, "state machine created");

        Ok(Self {
            kind,
            on_mismatch,
            states,
            initial,
            inner: RwLock::new(Inner {
                transitions: HashMap::new(),
                current: None,
            }),
        })
    }

    /// Enter the initial state.
    ///
    /// Succeeds once per machine. The initial state's enter hook is not
    /// fired, since no transition led there.
    pub fn initialize(&self) -> Result<(), FsmError<K>> {
        let mut inner = self.inner.write();
        if inner.current.is_some() {
            return Err(FsmError::AlreadyInitialized);
        }

        inner.current = Some(self.initial.clone());
        tracing::debug!(initial = ?self.initial, "state machine initialized");
        Ok(())
    }

    /// Register a named transition.
    ///
    /// Only allowed before `initialize`. Both endpoints must be declared
    /// states. Registering a name twice replaces the earlier transition.
    pub fn add_transition(
        &self,
        name: K,
        from: K,
        to: K,
        handler: Option<Handler<K>>,
    ) -> Result<(), FsmError<K>> {
        let mut inner = self.inner.write();
        if inner.current.is_some() {
            return Err(FsmError::TransitionsFrozen { name });
        }
        if self.kind == FsmKind::Anonymous {
            return Err(FsmError::TransitionTableUnsupported { name });
        }
        self.state(&from)?;
        self.state(&to)?;

        tracing::trace!(name = ?name, from = ?from, to = ?to, "adding transition");
        let transition = Transition {
            name: name.clone(),
            from,
            to,
            handler,
        };
        if inner.transitions.insert(name.clone(), transition).is_some() {
            tracing::debug!(name = ?name, "transition replaced");
        }
        Ok(())
    }

    /// Register a named transition whose handler is a closure.
    pub fn add_transition_fn<F>(
        &self,
        name: K,
        from: K,
        to: K,
        handler: F,
    ) -> Result<(), FsmError<K>>
    where
        F: Fn(&FsmContext<'_, K>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.add_transition(name, from, to, Some(Arc::new(handler)))
    }

    /// Drive the machine.
    ///
    /// For a [`FsmKind::Simple`] machine `name` is looked up in the
    /// transition table. If the transition starts at the current state its
    /// handler runs first; on success the `from` state's exit hook fires,
    /// the current state becomes `to`, then the `to` state's enter hook
    /// fires. A failing handler aborts with the state unchanged and no hook
    /// fired. A transition that starts elsewhere is ignored or rejected
    /// according to the machine's [`MismatchPolicy`].
    ///
    /// For a [`FsmKind::Anonymous`] machine `name` is the target state.
    /// Moving to the current state is a no-op.
    pub fn transition(&self, name: &K) -> Result<(), FsmError<K>> {
        let mut inner = self.inner.write();
        let Some(current) = inner.current.clone() else {
            return Err(FsmError::NotInitialized);
        };

        match self.kind {
            FsmKind::Simple => self.fire_named(&mut inner, name, current),
            FsmKind::Anonymous => self.fire_anonymous(&mut inner, name, current),
        }
    }

    fn fire_named(&self, inner: &mut Inner<K>, name: &K, current: K) -> Result<(), FsmError<K>> {
        let transition = inner
            .transitions
            .get(name)
            .ok_or_else(|| FsmError::UnknownTransition { name: name.clone() })?;

        if !transition.starts_at(&current) {
            return match self.on_mismatch {
                MismatchPolicy::Ignore => {
                    tracing::trace!(
                        name = ?name,
                        current = ?current,
                        "transition does not start at current state, ignored"
                    );
                    Ok(())
                }
                MismatchPolicy::Reject => Err(FsmError::InvalidSourceState {
                    name: name.clone(),
                    expected: transition.from.clone(),
                    current,
                }),
            };
        }

        let from = self.state(&transition.from)?;
        let to = self.state(&transition.to)?;
        let ctx = transition.context();

        if let Some(handler) = &transition.handler {
            let fsm_ctx = FsmContext::new(from, &self.states, ctx.clone());
            if let Err(err) = handler(&fsm_ctx) {
                tracing::debug!(name = ?name, error = %err, "transition handler vetoed");
                return Err(FsmError::Handler(err));
            }
        }

        Self::commit(&mut inner.current, from, to, &ctx);
        Ok(())
    }

    fn fire_anonymous(
        &self,
        inner: &mut Inner<K>,
        target: &K,
        current: K,
    ) -> Result<(), FsmError<K>> {
        let to = self.state(target)?;
        if *to.key() == current {
            return Ok(());
        }

        let from = self.state(&current)?;
        let ctx = TransitionContext {
            name: target.clone(),
            from: current,
            to: target.clone(),
        };

        Self::commit(&mut inner.current, from, to, &ctx);
        Ok(())
    }

    fn commit(
        current: &mut Option<K>,
        from: &State<K>,
        to: &State<K>,
        ctx: &TransitionContext<K>,
    ) {
        from.exit(ctx);
        *current = Some(to.key().clone());
        to.enter(ctx);
        tracing::debug!(name = ?ctx.name, from = ?ctx.from, to = ?ctx.to, "transition applied");
    }

    fn state(&self, key: &K) -> Result<&State<K>, FsmError<K>> {
        self.states
            .get(key)
            .ok_or_else(|| FsmError::UnknownState { state: key.clone() })
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.read().current.is_some()
    }

    /// The initial state. Fixed at construction.
    pub fn initial_state(&self) -> K {
        self.initial.clone()
    }

    /// The current state, or `None` before `initialize`.
    pub fn current_state(&self) -> Option<K> {
        self.inner.read().current.clone()
    }

    pub fn kind(&self) -> FsmKind {
        self.kind
    }

    /// Look up a declared state. Returns an identity-only copy.
    pub fn get_state(&self, key: &K) -> Option<State<K>> {
        self.states.get(key).map(State::identity)
    }

    /// Keys of every declared state, in no particular order.
    pub fn states(&self) -> Vec<K> {
        self.states.keys().cloned().collect()
    }

    pub fn has_transition(&self, name: &K) -> bool {
        self.inner.read().transitions.contains_key(name)
    }

    /// Names of the transitions that start at `state`, in no particular order.
    pub fn transitions_from(&self, state: &K) -> Vec<K> {
        self.inner
            .read()
            .transitions
            .values()
            .filter(|t| t.starts_at(state))
            .map(|t| t.name.clone())
            .collect()
    }
}

impl<K: StateKey> fmt::Debug for Fsm<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Fsm")
            .field("kind", &self.kind)
            .field("initial", &self.initial)
            .field("current", &inner.current)
            .field("states", &self.states.len())
            .field("transitions", &inner.transitions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorKind;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recording_config(log: &Log) -> FsmConfig<&'static str> {
        let enter_log = Arc::clone(log);
        let exit_log = Arc::clone(log);
        FsmConfig::new(["foo", "bar", "baz"], "bar")
            .with_on_enter(move |ctx| enter_log.lock().unwrap().push(format!("enter:{}", ctx.to)))
            .with_on_exit(move |ctx| exit_log.lock().unwrap().push(format!("exit:{}", ctx.from)))
    }

    #[test]
    fn construction_requires_declared_initial() {
        let result = Fsm::new(FsmConfig::new(["foo", "bar", "baz"], "qux"));

        match result {
            Err(FsmError::InitialStateNotFound { initial }) => assert_eq!(initial, "qux"),
            other => panic!("Expected InitialStateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn new_machine_is_uninitialized() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar"], "foo")).unwrap();

        assert!(!fsm.is_initialized());
        assert_eq!(fsm.current_state(), None);
        assert_eq!(fsm.initial_state(), "foo");
    }

    #[test]
    fn initialize_only_once() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar"], "foo")).unwrap();

        fsm.initialize().unwrap();
        let second = fsm.initialize();

        assert!(matches!(second, Err(FsmError::AlreadyInitialized)));
        assert_eq!(fsm.current_state(), Some("foo"));
    }

    #[test]
    fn initialize_does_not_fire_enter_hook() {
        let log = Log::default();
        let fsm = Fsm::new(recording_config(&log)).unwrap();

        fsm.initialize().unwrap();

        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn transition_before_initialize_fails() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar"], "bar")).unwrap();
        fsm.add_transition("yug", "bar", "foo", None).unwrap();

        let result = fsm.transition(&"yug");

        assert!(matches!(result, Err(FsmError::NotInitialized)));
        assert_eq!(fsm.current_state(), None);
    }

    #[test]
    fn add_transition_rejects_unknown_states() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar"], "bar")).unwrap();

        let bad_from = fsm.add_transition("yug", "qux", "foo", None);
        let bad_to = fsm.add_transition("yug", "bar", "qux", None);

        assert!(matches!(bad_from, Err(FsmError::UnknownState { state: "qux" })));
        assert!(matches!(bad_to, Err(FsmError::UnknownState { state: "qux" })));
        assert!(!fsm.has_transition(&"yug"));
    }

    #[test]
    fn add_transition_after_initialize_fails() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar"], "bar")).unwrap();
        fsm.initialize().unwrap();

        let result = fsm.add_transition("yug", "bar", "foo", None);

        assert!(matches!(result, Err(FsmError::TransitionsFrozen { name: "yug" })));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Lifecycle);
        assert!(!fsm.has_transition(&"yug"));
    }

    #[test]
    fn add_transition_last_write_wins() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar", "baz"], "bar")).unwrap();
        fsm.add_transition("yug", "bar", "foo", None).unwrap();
        fsm.add_transition("yug", "bar", "baz", None).unwrap();
        fsm.initialize().unwrap();

        fsm.transition(&"yug").unwrap();

        assert_eq!(fsm.current_state(), Some("baz"));
    }

    #[test]
    fn unknown_transition_fails_without_moving() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar"], "bar")).unwrap();
        fsm.initialize().unwrap();

        let result = fsm.transition(&"yug");

        assert!(matches!(result, Err(FsmError::UnknownTransition { name: "yug" })));
        assert_eq!(fsm.current_state(), Some("bar"));
    }

    #[test]
    fn hooks_fire_exit_then_enter() {
        let log = Log::default();
        let fsm = Fsm::new(recording_config(&log)).unwrap();
        fsm.add_transition("yug", "bar", "foo", None).unwrap();
        fsm.initialize().unwrap();

        fsm.transition(&"yug").unwrap();

        assert_eq!(fsm.current_state(), Some("foo"));
        assert_eq!(*log.lock().unwrap(), vec!["exit:bar", "enter:foo"]);
    }

    #[test]
    fn handler_runs_before_hooks() {
        let log = Log::default();
        let handler_log = Arc::clone(&log);
        let fsm = Fsm::new(recording_config(&log)).unwrap();
        fsm.add_transition_fn("yug", "bar", "foo", move |ctx| {
            handler_log
                .lock()
                .unwrap()
                .push(format!("handler:{}", ctx.current_state().key()));
            Ok(())
        })
        .unwrap();
        fsm.initialize().unwrap();

        fsm.transition(&"yug").unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["handler:bar", "exit:bar", "enter:foo"]
        );
    }

    #[test]
    fn failing_handler_aborts_transition() {
        let log = Log::default();
        let fsm = Fsm::new(recording_config(&log)).unwrap();
        fsm.add_transition_fn("yug", "bar", "foo", |_| Err("lorem ipsum".into()))
            .unwrap();
        fsm.initialize().unwrap();

        let result = fsm.transition(&"yug");

        match result {
            Err(err @ FsmError::Handler(_)) => {
                assert_eq!(err.kind(), ErrorKind::Handler);
                assert_eq!(err.to_string(), "lorem ipsum");
            }
            other => panic!("Expected handler error, got {:?}", other),
        }
        assert_eq!(fsm.current_state(), Some("bar"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn mismatched_source_is_ignored_by_default() {
        let log = Log::default();
        let calls = Arc::new(Mutex::new(0));
        let handler_calls = Arc::clone(&calls);
        let fsm = Fsm::new(recording_config(&log)).unwrap();
        fsm.add_transition_fn("back", "foo", "baz", move |_| {
            *handler_calls.lock().unwrap() += 1;
            Ok(())
        })
        .unwrap();
        fsm.initialize().unwrap();

        fsm.transition(&"back").unwrap();

        assert_eq!(fsm.current_state(), Some("bar"));
        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn mismatched_source_is_rejected_when_configured() {
        let config = FsmConfig::new(["foo", "bar", "baz"], "bar")
            .with_mismatch_policy(MismatchPolicy::Reject);
        let fsm = Fsm::new(config).unwrap();
        fsm.add_transition("back", "foo", "baz", None).unwrap();
        fsm.initialize().unwrap();

        let result = fsm.transition(&"back");

        match result {
            Err(FsmError::InvalidSourceState {
                name,
                expected,
                current,
            }) => {
                assert_eq!((name, expected, current), ("back", "foo", "bar"));
            }
            other => panic!("Expected InvalidSourceState, got {:?}", other),
        }
        assert_eq!(fsm.current_state(), Some("bar"));
    }

    #[test]
    fn handler_context_exposes_registry() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar", "baz"], "bar").with_on_enter(|_| {}))
            .unwrap();
        fsm.add_transition_fn("yug", "bar", "foo", |ctx| {
            assert_eq!(ctx.transition().name, "yug");
            assert_eq!(ctx.initial_state().key(), &"bar");
            let baz = ctx.get_state(&"baz").ok_or("baz missing")?;
            assert!(!baz.has_enter_hook());
            assert!(ctx.get_state(&"qux").is_none());
            Ok(())
        })
        .unwrap();
        fsm.initialize().unwrap();

        fsm.transition(&"yug").unwrap();
        assert_eq!(fsm.current_state(), Some("foo"));
    }

    #[test]
    fn self_loop_fires_both_hooks() {
        let log = Log::default();
        let fsm = Fsm::new(recording_config(&log)).unwrap();
        fsm.add_transition("stay", "bar", "bar", None).unwrap();
        fsm.initialize().unwrap();

        fsm.transition(&"stay").unwrap();

        assert_eq!(fsm.current_state(), Some("bar"));
        assert_eq!(*log.lock().unwrap(), vec!["exit:bar", "enter:bar"]);
    }

    #[test]
    fn anonymous_machine_moves_to_named_state() {
        let log = Log::default();
        let fsm = Fsm::new(recording_config(&log).with_kind(FsmKind::Anonymous)).unwrap();
        fsm.initialize().unwrap();

        fsm.transition(&"baz").unwrap();

        assert_eq!(fsm.current_state(), Some("baz"));
        assert_eq!(*log.lock().unwrap(), vec!["exit:bar", "enter:baz"]);
    }

    #[test]
    fn anonymous_machine_ignores_current_target() {
        let log = Log::default();
        let fsm = Fsm::new(recording_config(&log).with_kind(FsmKind::Anonymous)).unwrap();
        fsm.initialize().unwrap();

        fsm.transition(&"bar").unwrap();

        assert_eq!(fsm.current_state(), Some("bar"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn anonymous_machine_rejects_unknown_target() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar"], "bar").with_kind(FsmKind::Anonymous))
            .unwrap();
        fsm.initialize().unwrap();

        let result = fsm.transition(&"qux");

        assert!(matches!(result, Err(FsmError::UnknownState { state: "qux" })));
        assert_eq!(fsm.current_state(), Some("bar"));
    }

    #[test]
    fn anonymous_machine_has_no_transition_table() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar"], "bar").with_kind(FsmKind::Anonymous))
            .unwrap();

        let result = fsm.add_transition("yug", "bar", "foo", None);

        assert!(matches!(
            result,
            Err(FsmError::TransitionTableUnsupported { name: "yug" })
        ));
    }

    #[test]
    fn introspection_reports_configuration() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "bar", "baz"], "bar")).unwrap();
        fsm.add_transition("yug", "bar", "foo", None).unwrap();
        fsm.add_transition("zap", "bar", "baz", None).unwrap();
        fsm.add_transition("back", "foo", "bar", None).unwrap();

        let mut states = fsm.states();
        states.sort_unstable();
        let mut from_bar = fsm.transitions_from(&"bar");
        from_bar.sort_unstable();

        assert_eq!(states, vec!["bar", "baz", "foo"]);
        assert_eq!(from_bar, vec!["yug", "zap"]);
        assert!(fsm.has_transition(&"back"));
        assert!(fsm.get_state(&"foo").is_some());
        assert!(fsm.get_state(&"qux").is_none());
        assert_eq!(fsm.kind(), FsmKind::Simple);
    }

    #[test]
    fn duplicate_states_collapse() {
        let fsm = Fsm::new(FsmConfig::new(["foo", "foo", "bar"], "foo")).unwrap();
        assert_eq!(fsm.states().len(), 2);
    }
}
