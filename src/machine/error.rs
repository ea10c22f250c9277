//! Machine errors.

use crate::core::StateId;
use crate::wiring::WiringError;
use thiserror::Error;

/// Errors raised by a running machine.
///
/// Every variant is fatal for the call that produced it. Ordinary "nothing
/// to do" outcomes, such as no eligible transition, are not errors.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Transition wiring rejected ({} violation(s)): {}", .0.len(), join(.0))]
    InvalidWiring(Vec<WiringError>),

    #[error("State id {id} does not name any state")]
    UndefinedId { id: StateId },

    #[error("State '{name}' is not registered with this machine")]
    UnknownState { name: &'static str },

    #[error("Machine invariant violated: {0}")]
    Inconsistent(String),
}

fn join(errors: &[WiringError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
