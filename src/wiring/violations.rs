//! Wiring violations.

use crate::core::StateId;
use thiserror::Error;

/// A reason a transition cannot be registered.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WiringError {
    #[error("Transition {from} -> {to} starts at state id {id}, which is not registered")]
    UnknownSource {
        from: &'static str,
        to: &'static str,
        id: StateId,
    },

    #[error("Transition {from} -> {to} ends at state id {id}, which is not registered")]
    UnknownTarget {
        from: &'static str,
        to: &'static str,
        id: StateId,
    },

    #[error("Transition {from} -> {to} has invalid duration {duration}")]
    InvalidDuration {
        from: &'static str,
        to: &'static str,
        duration: f32,
    },
}
