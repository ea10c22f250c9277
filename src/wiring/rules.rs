//! Registration checks for transitions using Validation.

use crate::core::{StateId, StateTag};
use crate::transitions::Transition;
use crate::wiring::violations::WiringError;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check one transition against the set of registered ids.
pub fn validate_transition<T: StateTag, E>(
    registered: &HashSet<StateId>,
    transition: &Transition<T, E>,
) -> Validation<(), NonEmptyVec<WiringError>> {
    let from = transition.from.name();
    let to = transition.to.name();
    let mut checks: Vec<Validation<(), NonEmptyVec<WiringError>>> = Vec::new();

    let source = transition.from.id();
    checks.push(if registered.contains(&source) {
        Validation::success(())
    } else {
        Validation::fail(WiringError::UnknownSource {
            from,
            to,
            id: source,
        })
    });

    let target = transition.to.id();
    checks.push(if registered.contains(&target) {
        Validation::success(())
    } else {
        Validation::fail(WiringError::UnknownTarget {
            from,
            to,
            id: target,
        })
    });

    let duration = transition.duration;
    checks.push(if duration.is_finite() && duration >= 0.0 {
        Validation::success(())
    } else {
        Validation::fail(WiringError::InvalidDuration { from, to, duration })
    });

    Validation::all_vec(checks).map(|_| ())
}

/// Check a batch of transitions, accumulating ALL violations.
///
/// # Example
///
/// ```rust
/// use crossfade::transitions::Transition;
/// use crossfade::wiring::validate_transitions;
/// use crossfade::core::StateTag;
/// use crossfade::state_tag;
/// use std::collections::HashSet;
/// use stillwater::validation::Validation;
///
/// state_tag! {
///     enum Mode {
///         Idle,
///         Running,
///         Jumping,
///     }
/// }
///
/// let registered: HashSet<_> = [Mode::Idle.id(), Mode::Running.id()].into_iter().collect();
/// let batch: Vec<Transition<Mode>> = vec![
///     Transition::new(Mode::Idle, Mode::Running),
///     Transition::new(Mode::Idle, Mode::Jumping).lasting(-1.0),
/// ];
///
/// match validate_transitions(&registered, &batch) {
///     Validation::Failure(errors) => assert_eq!(errors.len(), 2),
///     Validation::Success(_) => panic!("expected violations"),
/// }
/// ```
pub fn validate_transitions<T: StateTag, E>(
    registered: &HashSet<StateId>,
    transitions: &[Transition<T, E>],
) -> Validation<(), NonEmptyVec<WiringError>> {
    let checks: Vec<Validation<(), NonEmptyVec<WiringError>>> = transitions
        .iter()
        .map(|transition| validate_transition(registered, transition))
        .collect();

    Validation::all_vec(checks).map(|_| ())
}
