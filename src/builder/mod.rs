//! Builder API for ergonomic state machine construction.
//!
//! This module provides the fluent machine builder, the transition factory
//! and the `state_tag!` macro.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionFactory;
