//! States and their enter/exit hooks.
//!
//! A state is identified by its key. Hooks are attached when the machine is
//! configured and stay inside the engine: every `State` handed out to callers
//! or handlers is an identity-only copy.

use super::context::TransitionContext;
use super::key::StateKey;
use std::fmt;
use std::sync::Arc;

/// Notification invoked when a state is entered or exited.
///
/// Hooks cannot veto a transition. They run while the engine holds its
/// exclusive lock, so they must not call back into the same machine.
pub type Hook<K> = Arc<dyn Fn(&TransitionContext<K>) + Send + Sync>;

/// A declared state of the machine.
///
/// # Example
///
/// ```rust
/// use keyfsm::core::State;
///
/// let state = State::new("idle").with_enter(|ctx| {
///     println!("entered {:?} via {:?}", ctx.to, ctx.name);
/// });
///
/// assert!(state.has_enter_hook());
/// assert!(!state.identity().has_enter_hook());
/// ```
#[derive(Clone)]
pub struct State<K: StateKey> {
    key: K,
    on_enter: Option<Hook<K>>,
    on_exit: Option<Hook<K>>,
}

impl<K: StateKey> State<K> {
    /// Create a state with no hooks.
    pub fn new(key: K) -> Self {
        Self {
            key,
            on_enter: None,
            on_exit: None,
        }
    }

    /// Attach an enter hook.
    pub fn with_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext<K>) + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(hook));
        self
    }

    /// Attach an exit hook.
    pub fn with_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext<K>) + Send + Sync + 'static,
    {
        self.on_exit = Some(Arc::new(hook));
        self
    }

    pub(crate) fn with_hooks(
        key: K,
        on_enter: Option<Hook<K>>,
        on_exit: Option<Hook<K>>,
    ) -> Self {
        Self {
            key,
            on_enter,
            on_exit,
        }
    }

    pub(crate) fn into_parts(self) -> (K, Option<Hook<K>>, Option<Hook<K>>) {
        (self.key, self.on_enter, self.on_exit)
    }

    /// The state's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn has_enter_hook(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_exit_hook(&self) -> bool {
        self.on_exit.is_some()
    }

    /// Copy of this state carrying only its key.
    pub fn identity(&self) -> Self {
        Self::new(self.key.clone())
    }

    pub(crate) fn enter(&self, ctx: &TransitionContext<K>) {
        if let Some(hook) = &self.on_enter {
            hook(ctx);
        }
    }

    pub(crate) fn exit(&self, ctx: &TransitionContext<K>) {
        if let Some(hook) = &self.on_exit {
            hook(ctx);
        }
    }
}

impl<K: StateKey> PartialEq for State<K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: StateKey> Eq for State<K> {}

impl<K: StateKey> fmt::Debug for State<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("key", &self.key)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}
