//! Named transitions between states.

use super::context::{FsmContext, TransitionContext};
use super::key::StateKey;
use std::fmt;
use std::sync::Arc;

/// Error returned by a transition handler to veto the transition.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Logic run before a transition commits.
///
/// Returning `Err` aborts the transition: the state is left unchanged and
/// no hook fires. Handlers run under the engine's exclusive lock and must
/// not call back into the same machine.
pub type Handler<K> = Arc<dyn Fn(&FsmContext<'_, K>) -> Result<(), HandlerError> + Send + Sync>;

/// A named, directed edge between two declared states.
///
/// Endpoints are stored by key and resolved through the state registry
/// when the transition executes.
pub struct Transition<K: StateKey> {
    pub name: K,
    pub from: K,
    pub to: K,
    pub handler: Option<Handler<K>>,
}

impl<K: StateKey> Transition<K> {
    pub fn new(name: K, from: K, to: K) -> Self {
        Self {
            name,
            from,
            to,
            handler: None,
        }
    }

    /// Attach a handler using a closure.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&FsmContext<'_, K>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Check whether this transition leaves `current` (pure).
    pub fn starts_at(&self, current: &K) -> bool {
        self.from == *current
    }

    pub fn context(&self) -> TransitionContext<K> {
        TransitionContext {
            name: self.name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}

impl<K: StateKey> Clone for Transition<K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<K: StateKey> fmt::Debug for Transition<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
