//! Guard predicates for controlling state transitions.
//!
//! A guard looks at the current state and, optionally, the event at the
//! front of the machine's queue. Guards are peeked, never consumed: every
//! guard evaluated during one lookup sees the same pending event.

use super::state::{StateTag, StateView};
use std::sync::Arc;

type Predicate<T, E> = dyn Fn(&StateView<T>, Option<&E>) -> bool + Send + Sync;

/// Predicate that determines if a transition is eligible.
///
/// # Example
///
/// ```rust
/// use crossfade::core::{Guard, StateView};
/// use crossfade::state_tag;
///
/// state_tag! {
///     enum Mode {
///         Idle,
///         Running,
///     }
/// }
///
/// #[derive(Debug)]
/// enum Signal {
///     Stop,
/// }
///
/// let guard: Guard<Mode, Signal> = Guard::after(2.0).or(Guard::on_event(|e: &Signal| matches!(e, Signal::Stop)));
///
/// let fresh = StateView { tag: Mode::Idle, weight: 1.0, active_time: 0.5 };
/// let stale = StateView { tag: Mode::Idle, weight: 1.0, active_time: 2.5 };
///
/// assert!(!guard.check(&fresh, None));
/// assert!(guard.check(&fresh, Some(&Signal::Stop)));
/// assert!(guard.check(&stale, None));
/// ```
pub struct Guard<T: StateTag, E = ()> {
    predicate: Arc<Predicate<T, E>>,
}

impl<T: StateTag, E> Guard<T, E> {
    /// Create a guard from a predicate over the current state and the
    /// pending event.
    ///
    /// The predicate must be deterministic for a given input.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&StateView<T>, Option<&E>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Unconditional guard, the default for every transition.
    pub fn always() -> Self {
        Self::new(|_, _| true)
    }

    /// Passes once the current state has been active strictly longer than
    /// `seconds`.
    pub fn after(seconds: f32) -> Self {
        Self::new(move |state, _| state.active_time > seconds)
    }

    /// Passes when an event is pending and `matches` accepts it.
    pub fn on_event<F>(matches: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self::new(move |_, event| event.is_some_and(&matches))
    }

    pub fn or(self, other: Guard<T, E>) -> Self
    where
        E: 'static,
    {
        Self::new(move |state, event| self.check(state, event) || other.check(state, event))
    }

    pub fn and(self, other: Guard<T, E>) -> Self
    where
        E: 'static,
    {
        Self::new(move |state, event| self.check(state, event) && other.check(state, event))
    }

    /// Evaluate the guard.
    pub fn check(&self, state: &StateView<T>, event: Option<&E>) -> bool {
        (self.predicate)(state, event)
    }
}

impl<T: StateTag, E> Clone for Guard<T, E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T: StateTag, E> Default for Guard<T, E> {
    fn default() -> Self {
        Self::always()
    }
}
