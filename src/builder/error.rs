//! Build errors for the machine builder and the transition factory.

use crate::config::ConfigError;
use crate::machine::MachineError;
use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No states registered. Call .state(tag, behaviour) before .build()")]
    NoStates,

    #[error("No state with id 0 registered. The zero-id state is the initial state")]
    MissingInitialState,

    #[error("State '{name}' registered more than once")]
    DuplicateState { name: &'static str },

    #[error("Transition source states not specified. Call .from([..])")]
    MissingFromStates,

    #[error("Transition target states not specified. Call .to([..])")]
    MissingToStates,

    #[error("Invalid machine options: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Machine(#[from] MachineError),
}
