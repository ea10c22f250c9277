//! Completed transition history.
//!
//! Provides immutable tracking of the transitions a machine has finished,
//! stamped both with machine-clock seconds and wall-clock time.

use super::state::StateTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single completed transition.
///
/// # Example
///
/// ```rust
/// use crossfade::core::StateTransition;
/// use crossfade::state_tag;
/// use chrono::Utc;
///
/// state_tag! {
///     enum Mode {
///         Idle,
///         Running,
///     }
/// }
///
/// let transition = StateTransition {
///     from: Mode::Idle,
///     to: Mode::Running,
///     started_at: 2.0,
///     finished_at: 3.0,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.elapsed(), 1.0);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<T: StateTag> {
    /// The state being transitioned from
    pub from: T,
    /// The state being transitioned to
    pub to: T,
    /// Machine time at which the transition began
    pub started_at: f32,
    /// Machine time at which the transition finished
    pub finished_at: f32,
    /// Wall-clock time of completion
    pub timestamp: DateTime<Utc>,
}

impl<T: StateTag> StateTransition<T> {
    /// Machine-clock seconds the transition took.
    pub fn elapsed(&self) -> f32 {
        self.finished_at - self.started_at
    }
}

/// Ordered history of completed transitions.
///
/// History is immutable - `record` returns a new history with the
/// transition added.
///
/// # Example
///
/// ```rust
/// use crossfade::core::{StateHistory, StateTransition};
/// use crossfade::state_tag;
/// use chrono::Utc;
///
/// state_tag! {
///     enum Phase {
///         Start,
///         Middle,
///         End,
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: Phase::Start,
///         to: Phase::Middle,
///         started_at: 0.0,
///         finished_at: 0.5,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: Phase::Middle,
///         to: Phase::End,
///         started_at: 1.0,
///         finished_at: 1.5,
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.get_path(), vec![&Phase::Start, &Phase::Middle, &Phase::End]);
/// assert_eq!(history.duration(), Some(1.5));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<T: StateTag> {
    transitions: Vec<StateTransition<T>>,
}

impl<T: StateTag> Default for StateHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StateTag> StateHistory<T> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<T>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Record a transition, keeping at most `limit` of the newest entries.
    pub fn record_bounded(&self, transition: StateTransition<T>, limit: usize) -> Self {
        let mut history = self.record(transition);
        let excess = history.transitions.len().saturating_sub(limit);
        history.transitions.drain(..excess);
        history
    }

    /// Append in place, dropping the oldest entries beyond `limit`.
    pub(crate) fn push(&mut self, transition: StateTransition<T>, limit: Option<usize>) {
        self.transitions.push(transition);
        if let Some(limit) = limit {
            let excess = self.transitions.len().saturating_sub(limit);
            self.transitions.drain(..excess);
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the first recorded source, then the destination of each
    /// transition.
    pub fn get_path(&self) -> Vec<&T> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Machine-clock span from the first start to the last finish.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<f32> {
        match (self.transitions.first(), self.transitions.last()) {
            (Some(first), Some(last)) => Some((last.finished_at - first.started_at).max(0.0)),
            _ => None,
        }
    }

    pub fn last(&self) -> Option<&StateTransition<T>> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[StateTransition<T>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
