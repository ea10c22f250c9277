//! FIFO queue of externally pushed events.

use std::collections::VecDeque;

/// Events waiting to be seen by transition guards.
///
/// Guards only ever peek at the front event. The machine pops one event
/// after every transition lookup, whether or not a guard used it.
#[derive(Clone, Debug)]
pub struct EventQueue<E> {
    events: VecDeque<E>,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: E) {
        self.events.push_back(event);
    }

    pub fn peek(&self) -> Option<&E> {
        self.events.front()
    }

    pub fn pop(&mut self) -> Option<E> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_leave_in_push_order() {
        let mut queue = EventQueue::new();
        queue.push("stop");
        queue.push("jump");

        assert_eq!(queue.peek(), Some(&"stop"));
        assert_eq!(queue.pop(), Some("stop"));
        assert_eq!(queue.pop(), Some("jump"));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut queue = EventQueue::new();
        queue.push(1);

        assert_eq!(queue.peek(), Some(&1));
        assert_eq!(queue.peek(), Some(&1));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn empty_queue_pops_nothing() {
        let mut queue: EventQueue<u8> = EventQueue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut queue = EventQueue::new();
        queue.push('a');
        queue.push('b');
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.iter().count(), 0);
    }
}
