//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder and a macro for declaring state
//! machines with minimal boilerplate. The builder validates the whole
//! configuration up front and reports every problem it finds at once.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, ConfigIssue};
pub use machine::FsmBuilder;

use crate::core::{FsmContext, HandlerError, StateKey, Transition};

/// Create a named transition without a handler.
///
/// # Example
///
/// ```
/// use keyfsm::builder::simple_transition;
///
/// let transition = simple_transition("open", "closed", "opened");
/// assert!(transition.starts_at(&"closed"));
/// ```
pub fn simple_transition<K: StateKey>(name: K, from: K, to: K) -> Transition<K> {
    Transition::new(name, from, to)
}

/// Create a named transition gated by a handler.
///
/// # Example
///
/// ```
/// use keyfsm::builder::guarded_transition;
///
/// let transition = guarded_transition("open", "closed", "opened", |ctx| {
///     if ctx.contains_state(&"opened") {
///         Ok(())
///     } else {
///         Err("no opened state".into())
///     }
/// });
/// assert!(transition.handler.is_some());
/// ```
pub fn guarded_transition<K, F>(name: K, from: K, to: K, handler: F) -> Transition<K>
where
    K: StateKey,
    F: Fn(&FsmContext<'_, K>) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Transition::new(name, from, to).with_handler(handler)
}
