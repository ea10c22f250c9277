//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::MachineOptions;
use crate::core::{State, StateTag, SystemClock, TimeSource};
use crate::machine::state_machine::BoxedState;
use crate::machine::StateMachine;
use crate::transitions::TransitionGroup;

/// Builder for constructing state machines with a fluent API.
///
/// States are registered in order; their `init` hooks run in that order
/// when the machine is built. The state whose tag has id `0` becomes the
/// initial state.
pub struct StateMachineBuilder<T: StateTag, E = (), C = ()> {
    host: C,
    states: Vec<(T, BoxedState<T, C>)>,
    transitions: TransitionGroup<T, E>,
    clock: Option<TimeSource>,
    options: MachineOptions,
}

impl<T: StateTag, E, C> StateMachineBuilder<T, E, C> {
    /// Create a builder for a machine owned by `host`.
    pub fn new(host: C) -> Self {
        Self {
            host,
            states: Vec::new(),
            transitions: TransitionGroup::default(),
            clock: None,
            options: MachineOptions::default(),
        }
    }

    /// Register the behaviour of one state.
    pub fn state<S>(self, tag: T, behavior: S) -> Self
    where
        S: State<T, C> + 'static,
    {
        self.boxed_state(tag, Box::new(behavior))
    }

    /// Register an already boxed behaviour.
    pub fn boxed_state(mut self, tag: T, behavior: BoxedState<T, C>) -> Self {
        self.states.push((tag, behavior));
        self
    }

    /// Use `source` as the time source. Defaults to a [`SystemClock`].
    pub fn clock<F>(mut self, source: F) -> Self
    where
        F: Fn() -> f32 + Send + Sync + 'static,
    {
        self.clock = Some(Box::new(source));
        self
    }

    pub fn options(mut self, options: MachineOptions) -> Self {
        self.options = options;
        self
    }

    /// Shorthand for setting only the machine name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = name.into();
        self
    }

    /// Queue transitions to register once the states exist.
    pub fn transitions(mut self, group: impl Into<TransitionGroup<T, E>>) -> Self {
        self.transitions.extend(group.into());
        self
    }

    /// Build the state machine.
    ///
    /// Validates the options, registers the states, enters the initial
    /// state and then registers the queued transitions as one batch.
    pub fn build(self) -> Result<StateMachine<T, E, C>, BuildError> {
        self.options.validate()?;

        let clock = self
            .clock
            .unwrap_or_else(|| SystemClock::new().source());
        let mut machine = StateMachine::init(self.host, self.states, clock, self.options)?;

        if !self.transitions.is_empty() {
            machine.add_transitions(self.transitions)?;
        }

        Ok(machine)
    }
}
