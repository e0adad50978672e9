//! Build errors for the state machine builder.

use crate::core::StateKey;
use crate::engine::FsmError;
use std::fmt::Debug;
use thiserror::Error;

/// A single problem found while validating a builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue<K: Debug> {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state {initial:?} is not among the declared states")]
    InitialStateNotFound { initial: K },

    #[error("Transition {transition:?} references undeclared state {state:?}")]
    UnknownState { transition: K, state: K },

    #[error("Transition {transition:?} added to an anonymous state machine")]
    AnonymousTransition { transition: K },
}

/// Errors returned by [`FsmBuilder::build`](super::FsmBuilder::build).
#[derive(Debug, Error)]
pub enum BuildError<K: StateKey> {
    /// Validation failed. Holds every issue found, not just the first.
    #[error("Invalid state machine configuration ({} issue(s))", .0.len())]
    Invalid(Vec<ConfigIssue<K>>),

    #[error(transparent)]
    Fsm(#[from] FsmError<K>),
}

impl<K: StateKey> BuildError<K> {
    /// Issues found during validation. Empty for engine errors.
    pub fn issues(&self) -> &[ConfigIssue<K>] {
        match self {
            Self::Invalid(issues) => issues,
            Self::Fsm(_) => &[],
        }
    }
}
