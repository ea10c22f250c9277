//! Validation of transition wiring.
//!
//! Registration checks accumulate every violation in a batch with
//! Stillwater's `Validation` instead of stopping at the first one, so a
//! mis-wired machine reports all of its problems at startup.

pub mod rules;
pub mod violations;

pub use rules::{validate_transition, validate_transitions};
pub use violations::WiringError;
