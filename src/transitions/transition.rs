//! Transitions between two states and the way they progress over time.

use crate::core::{Guard, StateTag, StateView};
use crate::easing::Ease;
use std::fmt;
use std::sync::Arc;

/// Blending function mapping normalised elapsed time to progress.
///
/// The result is never clamped; overshooting curves are allowed.
#[derive(Clone)]
pub struct Blend {
    function: Arc<dyn Fn(f32) -> f32 + Send + Sync>,
}

impl Blend {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        Self {
            function: Arc::new(function),
        }
    }

    /// Identity blend.
    pub fn linear() -> Self {
        Self::new(|t| t)
    }

    pub fn ease(ease: Ease) -> Self {
        Self::new(ease.function())
    }

    pub fn apply(&self, t: f32) -> f32 {
        (self.function)(t)
    }
}

impl Default for Blend {
    fn default() -> Self {
        Self::linear()
    }
}

impl From<Ease> for Blend {
    fn from(ease: Ease) -> Self {
        Self::ease(ease)
    }
}

impl fmt::Debug for Blend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Blend(..)")
    }
}

/// How a transition moves from its source to its destination.
#[derive(Clone, Debug, Default)]
pub enum Progression {
    /// Binary switch once `duration` has elapsed.
    #[default]
    Delay,
    /// Crossfade the two weights along a blending function.
    Blend(Blend),
}

/// Weights to assign to the two endpoints of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendWeights {
    pub from: f32,
    pub to: f32,
}

/// Outcome of one progression step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressStep {
    /// Intermediate weights, present only for blend steps
    pub weights: Option<BlendWeights>,
    pub finished: bool,
}

impl ProgressStep {
    fn finished() -> Self {
        Self {
            weights: None,
            finished: true,
        }
    }

    fn waiting() -> Self {
        Self {
            weights: None,
            finished: false,
        }
    }
}

type FinishCallback<T> = Arc<dyn Fn(T, T) + Send + Sync>;

/// A directed, guarded edge between two states.
///
/// Transitions are immutable once registered. The time at which a
/// transition began is owned by the machine, which passes the elapsed time
/// into [`Transition::progress`] on every tick.
///
/// # Example
///
/// ```rust
/// use crossfade::transitions::Transition;
/// use crossfade::state_tag;
///
/// state_tag! {
///     enum Mode {
///         Idle,
///         Running,
///     }
/// }
///
/// let fade: Transition<Mode> = Transition::blended(Mode::Idle, Mode::Running).lasting(1.0);
///
/// let halfway = fade.progress(0.5, 0.01);
/// assert!(!halfway.finished);
/// assert_eq!(halfway.weights.map(|w| w.to), Some(0.5));
///
/// assert!(fade.progress(1.0, 0.01).finished);
/// ```
pub struct Transition<T: StateTag, E = ()> {
    pub from: T,
    pub to: T,
    pub guard: Guard<T, E>,
    /// Seconds; `0` means instantaneous
    pub duration: f32,
    pub progression: Progression,
    on_finished: Vec<FinishCallback<T>>,
}

impl<T: StateTag, E> Transition<T, E> {
    /// Unconditional, instantaneous transition.
    pub fn new(from: T, to: T) -> Self {
        Self {
            from,
            to,
            guard: Guard::always(),
            duration: 0.0,
            progression: Progression::Delay,
            on_finished: Vec::new(),
        }
    }

    /// Unconditional transition that crossfades linearly.
    pub fn blended(from: T, to: T) -> Self {
        Self::new(from, to).with_blend(Blend::linear())
    }

    /// Replace the guard with a predicate.
    pub fn when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&StateView<T>, Option<&E>) -> bool + Send + Sync + 'static,
    {
        self.guard = Guard::new(condition);
        self
    }

    pub fn guarded(mut self, guard: Guard<T, E>) -> Self {
        self.guard = guard;
        self
    }

    /// Set the duration in seconds.
    pub fn lasting(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn with_blend(mut self, blend: impl Into<Blend>) -> Self {
        self.progression = Progression::Blend(blend.into());
        self
    }

    /// Run `callback(from, to)` every time this transition finishes.
    pub fn on_finished<F>(mut self, callback: F) -> Self
    where
        F: Fn(T, T) + Send + Sync + 'static,
    {
        self.on_finished.push(Arc::new(callback));
        self
    }

    pub fn is_blend(&self) -> bool {
        matches!(self.progression, Progression::Blend(_))
    }

    /// Evaluate the guard only. Endpoint permissions are checked by the
    /// machine.
    pub fn check(&self, current: &StateView<T>, event: Option<&E>) -> bool {
        self.guard.check(current, event)
    }

    /// Baseline weights at the start of the transition.
    pub fn begin(&self) -> BlendWeights {
        BlendWeights { from: 1.0, to: 0.0 }
    }

    /// Advance by one step, `elapsed` seconds after `begin`.
    ///
    /// Blend transitions shorter than `instant_threshold` complete at once
    /// without intermediate weights.
    pub fn progress(&self, elapsed: f32, instant_threshold: f32) -> ProgressStep {
        match &self.progression {
            Progression::Delay => {
                if self.duration <= 0.0 || elapsed >= self.duration {
                    ProgressStep::finished()
                } else {
                    ProgressStep::waiting()
                }
            }
            Progression::Blend(blend) => {
                if self.duration < instant_threshold {
                    return ProgressStep::finished();
                }

                let t = elapsed / self.duration;
                let progress = blend.apply(t);
                ProgressStep {
                    weights: Some(BlendWeights {
                        from: 1.0 - progress,
                        to: progress,
                    }),
                    finished: t >= 1.0,
                }
            }
        }
    }

    /// Final weights. Fires the finish callbacks.
    pub fn finish(&self) -> BlendWeights {
        for callback in &self.on_finished {
            callback(self.from, self.to);
        }
        BlendWeights { from: 0.0, to: 1.0 }
    }
}

impl<T: StateTag, E> Clone for Transition<T, E> {
    fn clone(&self) -> Self {
        Self {
            from: self.from,
            to: self.to,
            guard: self.guard.clone(),
            duration: self.duration,
            progression: self.progression.clone(),
            on_finished: self.on_finished.clone(),
        }
    }
}

impl<T: StateTag, E> fmt::Debug for Transition<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("progression", &self.progression)
            .finish_non_exhaustive()
    }
}
