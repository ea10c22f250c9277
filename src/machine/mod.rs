//! The running state machine.
//!
//! A [`StateMachine`] owns its states, their outgoing transitions, the event
//! queue and the host object. The host ticks it with `update` and
//! `fixed_update`; everything else happens inside those calls.

pub mod error;
pub mod events;
pub mod state_machine;

pub use error::MachineError;
pub use events::EventQueue;
pub use state_machine::{BoxedState, StateMachine, Tick, TransitionNotice};
