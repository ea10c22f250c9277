//! Factory for wiring many transitions that share a guard.

use crate::builder::error::BuildError;
use crate::core::{Guard, StateTag, StateView};
use crate::easing::Ease;
use crate::transitions::{Blend, Progression, Transition, TransitionGroup};
use std::marker::PhantomData;

/// Fluent factory producing the cross product of source and target states.
///
/// Every produced transition shares the same guard, duration and blend.
///
/// # Example
///
/// ```rust
/// use crossfade::transitions::Transition;
/// use crossfade::state_tag;
///
/// state_tag! {
///     enum Stance {
///         Stand,
///         Crouch,
///         Prone,
///     }
/// }
///
/// let group = Transition::<Stance>::from_each([Stance::Stand, Stance::Crouch])
///     .to([Stance::Prone])
///     .lasting(0.25)
///     .blended()
///     .when(|state, _| state.active_time > 1.0)
///     .unwrap();
///
/// assert_eq!(group.len(), 2);
/// assert!(group.iter().all(|t| t.to == Stance::Prone && t.is_blend()));
/// ```
pub struct TransitionFactory<T: StateTag, E = ()> {
    from: Vec<T>,
    to: Vec<T>,
    duration: f32,
    progression: Progression,
    _event: PhantomData<E>,
}

impl<T: StateTag, E> TransitionFactory<T, E> {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            from: Vec::new(),
            to: Vec::new(),
            duration: 0.0,
            progression: Progression::Delay,
            _event: PhantomData,
        }
    }

    /// Add source states (required).
    pub fn from(mut self, states: impl IntoIterator<Item = T>) -> Self {
        self.from.extend(states);
        self
    }

    /// Add target states (required).
    pub fn to(mut self, states: impl IntoIterator<Item = T>) -> Self {
        self.to.extend(states);
        self
    }

    pub fn lasting(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    /// Crossfade linearly.
    pub fn blended(self) -> Self {
        self.with_blend(Blend::linear())
    }

    /// Crossfade with a custom curve.
    pub fn blend<F>(self, function: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        self.with_blend(Blend::new(function))
    }

    /// Crossfade with a named easing curve.
    pub fn ease(self, ease: Ease) -> Self {
        self.with_blend(Blend::ease(ease))
    }

    fn with_blend(mut self, blend: Blend) -> Self {
        self.progression = Progression::Blend(blend);
        self
    }

    /// Finish with a guard predicate.
    pub fn when<F>(self, condition: F) -> Result<TransitionGroup<T, E>, BuildError>
    where
        F: Fn(&StateView<T>, Option<&E>) -> bool + Send + Sync + 'static,
    {
        self.guarded(Guard::new(condition))
    }

    /// Finish without a condition.
    pub fn unconditionally(self) -> Result<TransitionGroup<T, E>, BuildError> {
        self.guarded(Guard::always())
    }

    /// Finish with a prepared guard.
    pub fn guarded(self, guard: Guard<T, E>) -> Result<TransitionGroup<T, E>, BuildError> {
        if self.from.is_empty() {
            return Err(BuildError::MissingFromStates);
        }
        if self.to.is_empty() {
            return Err(BuildError::MissingToStates);
        }

        let mut group = TransitionGroup::many(Vec::with_capacity(self.from.len() * self.to.len()));
        for &from in &self.from {
            for &to in &self.to {
                let mut transition = Transition::new(from, to)
                    .guarded(guard.clone())
                    .lasting(self.duration);
                transition.progression = self.progression.clone();
                group.push(transition);
            }
        }
        Ok(group)
    }
}

impl<T: StateTag, E> Default for TransitionFactory<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StateTag, E> Transition<T, E> {
    /// Start a [`TransitionFactory`] from several source states.
    pub fn from_each(states: impl IntoIterator<Item = T>) -> TransitionFactory<T, E> {
        TransitionFactory::new().from(states)
    }
}
