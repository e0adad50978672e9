//! Core data model of the state machine.
//!
//! This module contains the leaf types the engine is built from:
//! - State keys via the `StateKey` trait
//! - States with optional enter/exit hooks
//! - Named transitions with optional handlers
//! - The contexts handed to handlers and hooks
//!
//! Nothing here takes a lock. The engine owns these values and decides
//! when they are consulted.

mod context;
mod key;
mod state;
mod transition;

pub use context::{FsmContext, TransitionContext};
pub use key::StateKey;
pub use state::{Hook, State};
pub use transition::{Handler, HandlerError, Transition};
