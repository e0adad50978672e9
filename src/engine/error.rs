//! Errors raised by the engine.

use crate::core::HandlerError;
use std::fmt::Debug;
use thiserror::Error;

/// Broad category of an [`FsmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The machine could not be constructed.
    Configuration,
    /// The operation is not valid in the machine's current phase.
    Lifecycle,
    /// A referenced state or transition does not exist.
    Lookup,
    /// A transition handler vetoed the transition.
    Handler,
}

/// Errors that can occur when constructing or driving a machine.
#[derive(Debug, Error)]
pub enum FsmError<K: Debug> {
    #[error("Initial state {initial:?} is not among the declared states")]
    InitialStateNotFound { initial: K },

    #[error("State machine already initialized")]
    AlreadyInitialized,

    #[error("State machine not initialized. Call .initialize() first")]
    NotInitialized,

    #[error("State machine already initialized, cannot add transition {name:?}")]
    TransitionsFrozen { name: K },

    #[error("Anonymous state machines do not take named transitions ({name:?})")]
    TransitionTableUnsupported { name: K },

    #[error("Transition {name:?} starts at {expected:?} but the machine is in {current:?}")]
    InvalidSourceState { name: K, expected: K, current: K },

    #[error("State {state:?} does not exist")]
    UnknownState { state: K },

    #[error("Transition {name:?} not found")]
    UnknownTransition { name: K },

    #[error(transparent)]
    Handler(HandlerError),
}

impl<K: Debug> FsmError<K> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InitialStateNotFound { .. } => ErrorKind::Configuration,
            Self::AlreadyInitialized
            | Self::NotInitialized
            | Self::TransitionsFrozen { .. }
            | Self::TransitionTableUnsupported { .. }
            | Self::InvalidSourceState { .. } => ErrorKind::Lifecycle,
            Self::UnknownState { .. } | Self::UnknownTransition { .. } => ErrorKind::Lookup,
            Self::Handler(_) => ErrorKind::Handler,
        }
    }

    /// The handler's own error, if this is a handler failure.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
