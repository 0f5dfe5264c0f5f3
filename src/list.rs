//! Intrusive event list over a slot arena.
//!
//! Events live in a fixed array of `N` slots and are chained into sweep
//! order through `prev`/`next` slot indices. The arena is the sole owner of
//! every live event: removal unlinks the node *and* vacates its slot in one
//! step, so stale links can never outlive the event they point at.
//!
//! Slot `i` holds the event with id `i + 1`, which gives O(1) id lookup and
//! ties id validity directly to slot occupancy — an id is live exactly as
//! long as its slot is.

use crate::error::TimerError;
use crate::event::{Event, EventId};

/// Doubly linked event list backed by a slot arena.
///
/// Append is O(1) at the tail; removal is O(1) given a slot index.
/// Traversal order is insertion order. `N` is the concurrent-event capacity
/// and must be in `[1, 255]` (checked at compile time).
pub(crate) struct EventList<T, const N: usize> {
    slots: [Option<Event<T>>; N],
    head: Option<u8>,
    tail: Option<u8>,
    len: usize,
}

impl<T, const N: usize> EventList<T, N> {
    /// Create an empty list.
    pub(crate) fn new() -> Self {
        const {
            assert!(N >= 1 && N <= 255, "event capacity must be in [1, 255]");
        }

        Self {
            slots: [const { None }; N],
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of live events.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Check if no events are scheduled.
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot index of the first event in sweep order.
    pub(crate) fn head(&self) -> Option<u8> {
        self.head
    }

    /// Slot index of the last event in sweep order.
    pub(crate) fn tail(&self) -> Option<u8> {
        self.tail
    }

    /// Borrow the event in `slot`, if live.
    pub(crate) fn get(&self, slot: u8) -> Option<&Event<T>> {
        self.slots.get(usize::from(slot))?.as_ref()
    }

    /// Mutably borrow the event in `slot`, if live.
    pub(crate) fn get_mut(&mut self, slot: u8) -> Option<&mut Event<T>> {
        self.slots.get_mut(usize::from(slot))?.as_mut()
    }

    /// Lowest vacant slot index, or `None` when every slot is live.
    ///
    /// Ascending scan from slot 0 keeps id assignment at "smallest unused
    /// id ≥ 1". O(N) is fine at this scale (N ≤ 255).
    fn allocate(&self) -> Option<u8> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(|index| index as u8)
    }

    /// Place `event` in the lowest vacant slot and link it at the tail.
    ///
    /// Returns the new event's id, or [`TimerError::Exhausted`] without
    /// side effects when no slot is free.
    pub(crate) fn insert(&mut self, mut event: Event<T>) -> Result<EventId, TimerError> {
        let slot = self.allocate().ok_or(TimerError::Exhausted)?;
        let id = EventId::from_index(slot).ok_or(TimerError::Exhausted)?;

        event.prev = self.tail;
        event.next = None;
        self.slots[usize::from(slot)] = Some(event);

        match self.tail {
            Some(tail) => {
                if let Some(prev) = self.get_mut(tail) {
                    prev.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;

        Ok(id)
    }

    /// Unlink the event in `slot` and vacate the slot, returning the event.
    ///
    /// Handles all four positions: sole node (list becomes empty), head
    /// (successor becomes head), tail (predecessor becomes tail), interior
    /// (neighbors stitched together). Returns `None` for a vacant slot.
    pub(crate) fn remove(&mut self, slot: u8) -> Option<Event<T>> {
        let event = self.slots.get_mut(usize::from(slot))?.take()?;

        match event.prev {
            Some(prev) => {
                if let Some(node) = self.get_mut(prev) {
                    node.next = event.next;
                }
            }
            None => self.head = event.next,
        }
        match event.next {
            Some(next) => {
                if let Some(node) = self.get_mut(next) {
                    node.prev = event.prev;
                }
            }
            None => self.tail = event.prev,
        }
        self.len -= 1;

        Some(event)
    }

    /// Remove and return the first event in sweep order.
    pub(crate) fn remove_head(&mut self) -> Option<Event<T>> {
        self.remove(self.head?)
    }

    /// Remove and return the last event in sweep order.
    pub(crate) fn remove_tail(&mut self) -> Option<Event<T>> {
        self.remove(self.tail?)
    }
}

impl<T, const N: usize> Default for EventList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> core::fmt::Debug for EventList<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventList")
            .field("len", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish_non_exhaustive()
    }
}
