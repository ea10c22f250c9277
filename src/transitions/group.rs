//! Batches of transitions registered together.

use super::transition::Transition;
use crate::core::StateTag;

/// One or more transitions, usually produced by a
/// [`TransitionFactory`](crate::builder::TransitionFactory).
///
/// Groups exist only to batch registration; the machine keeps the
/// transitions, not the group.
pub struct TransitionGroup<T: StateTag, E = ()> {
    transitions: Vec<Transition<T, E>>,
}

impl<T: StateTag, E> TransitionGroup<T, E> {
    pub fn one(transition: Transition<T, E>) -> Self {
        Self {
            transitions: vec![transition],
        }
    }

    pub fn many(transitions: Vec<Transition<T, E>>) -> Self {
        Self { transitions }
    }

    pub fn push(&mut self, transition: Transition<T, E>) {
        self.transitions.push(transition);
    }

    /// Append every transition of another group, keeping order.
    pub fn extend(&mut self, other: TransitionGroup<T, E>) {
        self.transitions.extend(other.transitions);
    }

    /// Chain another group after this one.
    pub fn and(mut self, other: TransitionGroup<T, E>) -> Self {
        self.extend(other);
        self
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transition<T, E>> {
        self.transitions.iter()
    }

    pub fn as_slice(&self) -> &[Transition<T, E>] {
        &self.transitions
    }
}

impl<T: StateTag, E> Default for TransitionGroup<T, E> {
    fn default() -> Self {
        Self::many(Vec::new())
    }
}

impl<T: StateTag, E> Clone for TransitionGroup<T, E> {
    fn clone(&self) -> Self {
        Self {
            transitions: self.transitions.clone(),
        }
    }
}

impl<T: StateTag, E> std::fmt::Debug for TransitionGroup<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.transitions.iter()).finish()
    }
}

impl<T: StateTag, E> From<Transition<T, E>> for TransitionGroup<T, E> {
    fn from(transition: Transition<T, E>) -> Self {
        Self::one(transition)
    }
}

impl<T: StateTag, E> From<Vec<Transition<T, E>>> for TransitionGroup<T, E> {
    fn from(transitions: Vec<Transition<T, E>>) -> Self {
        Self::many(transitions)
    }
}

impl<T: StateTag, E> IntoIterator for TransitionGroup<T, E> {
    type Item = Transition<T, E>;
    type IntoIter = std::vec::IntoIter<Transition<T, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.into_iter()
    }
}

impl<'a, T: StateTag, E> IntoIterator for &'a TransitionGroup<T, E> {
    type Item = &'a Transition<T, E>;
    type IntoIter = std::slice::Iter<'a, Transition<T, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}

impl<T: StateTag, E> FromIterator<Transition<T, E>> for TransitionGroup<T, E> {
    fn from_iter<I: IntoIterator<Item = Transition<T, E>>>(iter: I) -> Self {
        Self::many(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateId;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        A,
        B,
        C,
    }

    impl StateTag for TestState {
        fn id(&self) -> StateId {
            *self as StateId
        }

        fn from_id(id: StateId) -> Option<Self> {
            match id {
                0 => Some(Self::A),
                1 => Some(Self::B),
                2 => Some(Self::C),
                _ => None,
            }
        }

        fn name(&self) -> &'static str {
            match self {
                Self::A => "A",
                Self::B => "B",
                Self::C => "C",
            }
        }
    }

    #[test]
    fn groups_keep_insertion_order() {
        let group: TransitionGroup<TestState> = TransitionGroup::one(Transition::new(TestState::A, TestState::B))
            .and(TransitionGroup::many(vec![
                Transition::new(TestState::B, TestState::C),
                Transition::new(TestState::C, TestState::A),
            ]));

        let edges: Vec<_> = group.iter().map(|t| (t.from, t.to)).collect();
        assert_eq!(
            edges,
            vec![
                (TestState::A, TestState::B),
                (TestState::B, TestState::C),
                (TestState::C, TestState::A),
            ]
        );
    }

    #[test]
    fn single_transition_converts_into_group() {
        let group: TransitionGroup<TestState> = Transition::new(TestState::A, TestState::C).into();
        assert_eq!(group.len(), 1);
        assert!(!group.is_empty());
    }

    #[test]
    fn collects_from_iterator() {
        let group: TransitionGroup<TestState> = [TestState::B, TestState::C]
            .into_iter()
            .map(|to| Transition::new(TestState::A, to))
            .collect();

        assert_eq!(group.len(), 2);
        assert_eq!(group.into_iter().last().map(|t| t.to), Some(TestState::C));
    }
}
