//! Keyfsm: an embeddable finite state machine engine
//!
//! Keyfsm drives a machine through a fixed set of named states using named
//! transitions. Each transition may carry a handler that can veto it, and
//! each state may carry enter/exit hooks that are notified when it is left
//! or entered. The engine is a passive object: it spawns nothing, and every
//! call runs to completion on the caller's thread.
//!
//! # Core Concepts
//!
//! - **State**: a key plus optional enter/exit hooks
//! - **Transition**: a named edge between two states, optionally gated by a handler
//! - **Fsm**: the engine, guarding its state behind a single reader-writer lock
//! - **Context**: read-only snapshots handed to handlers and hooks
//!
//! Keys can be any `Clone + Eq + Hash + Debug` value: string slices,
//! integers, or enums declared with [`state_enum!`].
//!
//! # Example
//!
//! ```rust
//! use keyfsm::builder::FsmBuilder;
//! use keyfsm::engine::ErrorKind;
//!
//! let fsm = FsmBuilder::new()
//!     .states(["foo", "bar", "baz"])
//!     .initial("bar")
//!     .on_exit(|ctx| println!("leaving {}", ctx.from))
//!     .on_enter(|ctx| println!("entering {}", ctx.to))
//!     .guarded("yug", "bar", "foo", |_ctx| Ok(()))
//!     .build()
//!     .unwrap();
//!
//! let err = fsm.transition(&"yug").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Lifecycle);
//!
//! fsm.initialize().unwrap();
//! fsm.transition(&"yug").unwrap();
//! assert_eq!(fsm.current_state(), Some("foo"));
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::FsmBuilder;
pub use crate::core::{FsmContext, State, StateKey, Transition, TransitionContext};
pub use engine::{ErrorKind, Fsm, FsmConfig, FsmError, FsmKind, MismatchPolicy};
