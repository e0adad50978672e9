//! The state machine engine.
//!
//! This module owns the runtime half of the crate: the [`Fsm`] itself, the
//! [`FsmConfig`] it is constructed from, and the [`FsmError`] taxonomy its
//! operations return.
//!
//! # Lifecycle
//!
//! - **Constructed**: states and initial state fixed, no transitions
//! - **Configured**: transitions added with `add_transition`
//! - **Initialized**: `initialize` entered the initial state; the
//!   transition table is frozen from here on
//!
//! Every operation is synchronous and runs on the caller's thread. The
//! engine spawns nothing and never retries.

mod config;
mod error;
mod machine;

pub use config::{FsmConfig, FsmKind, MismatchPolicy};
pub use error::{ErrorKind, FsmError};
pub use machine::Fsm;
