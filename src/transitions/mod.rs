//! Transitions and transition groups.
//!
//! A [`Transition`] is pure data plus pure progression logic: it computes
//! weights and completion from elapsed time, and the machine applies them.
//! Blend transitions are transitions whose [`Progression`] is `Blend`.

mod group;
mod transition;

pub use group::TransitionGroup;
pub use transition::{Blend, BlendWeights, ProgressStep, Progression, Transition};
