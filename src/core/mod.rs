//! Core state machine types.
//!
//! This module contains the building blocks shared by every machine:
//! - State tags and the `State` behaviour trait
//! - Guard predicates for transition eligibility
//! - Time sources
//! - Immutable transition history

mod clock;
mod guard;
mod history;
mod state;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{resolve_tag, State, StateContext, StateId, StateTag, StateView};
