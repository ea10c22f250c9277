//! Crossfade: a tick-driven state machine with weighted transitions
//!
//! Crossfade drives a finite set of states from the host's frame loop. Each
//! state carries a blend weight, so a transition can crossfade two states
//! over time instead of switching at once. That makes it a good fit for
//! animation controllers and AI behaviours.
//!
//! Transition logic follows a "pure core, imperative shell" split. A
//! [`Transition`](transitions::Transition) only computes weights from
//! elapsed time. The [`StateMachine`](machine::StateMachine) applies them,
//! runs the lifecycle hooks and keeps the event queue.
//!
//! # Core Concepts
//!
//! - **State tags**: a small `Copy` enum mapped onto dense ids via
//!   [`StateTag`](crate::core::StateTag); the zero-id tag is the initial state
//! - **States**: host behaviour implementing [`State`](crate::core::State) hooks
//! - **Guards**: predicates over the current state and the front event
//! - **Blends**: easing curves that move weight from source to target
//! - **Events**: FIFO queue pushed by the host, one event consumed per lookup
//!
//! # Example
//!
//! ```rust
//! use crossfade::builder::StateMachineBuilder;
//! use crossfade::core::{Guard, ManualClock, State, StateContext};
//! use crossfade::easing::Ease;
//! use crossfade::machine::{StateMachine, Tick};
//! use crossfade::transitions::Transition;
//! use crossfade::state_tag;
//!
//! state_tag! {
//!     pub enum Mode {
//!         Idle,
//!         Running,
//!     }
//! }
//!
//! #[derive(Debug, PartialEq)]
//! enum Input {
//!     Go,
//! }
//!
//! struct Pose;
//!
//! impl State<Mode> for Pose {
//!     fn on_update(&mut self, _ctx: &mut StateContext<'_, Mode, ()>) {}
//! }
//!
//! let clock = ManualClock::new();
//! let mut machine: StateMachine<Mode, Input> = StateMachineBuilder::new(())
//!     .state(Mode::Idle, Pose)
//!     .state(Mode::Running, Pose)
//!     .clock(clock.source())
//!     .transitions(
//!         Transition::new(Mode::Idle, Mode::Running)
//!             .guarded(Guard::on_event(|input: &Input| *input == Input::Go))
//!             .with_blend(Ease::EaseInOutSine)
//!             .lasting(0.5),
//!     )
//!     .build()
//!     .unwrap();
//!
//! machine.push_event(Input::Go);
//! machine.update().unwrap();
//! assert!(machine.is_transitioning());
//!
//! clock.advance(0.5);
//! let tick = machine.update().unwrap();
//! assert_eq!(tick, Tick::Changed { from: Mode::Idle, to: Mode::Running });
//! assert_eq!(machine.weight(Mode::Running), Some(1.0));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod easing;
pub mod machine;
pub mod transitions;
pub mod wiring;

// Re-export commonly used types
pub use self::builder::{BuildError, StateMachineBuilder, TransitionFactory};
pub use self::config::MachineOptions;
pub use self::core::{Guard, State, StateContext, StateTag, StateView};
pub use self::easing::Ease;
pub use self::machine::{MachineError, StateMachine, Tick};
pub use self::transitions::{Transition, TransitionGroup};
