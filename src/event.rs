//! Event data model.
//!
//! An [`Event`] is one scheduled action: when it last fired, how often it
//! fires, how many firings remain, and what happens when it fires. Events
//! live in the timer's slot arena and are linked into the sweep order via
//! index links (see `list`).

use core::fmt;
use core::num::NonZeroU8;

use crate::io::PinState;

/// Handle to a live event.
///
/// Ids are small positive integers in `[1, 255]`, unique among live events.
/// An id stays valid exactly as long as its event is scheduled; once the
/// event retires the id is recycled for future events.
///
/// Wrapping `NonZeroU8` makes the "no event" sentinel unrepresentable:
/// creation failure is reported through `Result` instead of a reserved
/// zero id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EventId(NonZeroU8);

impl EventId {
    /// Numeric id value in `[1, 255]`.
    pub fn get(self) -> u8 {
        self.0.get()
    }

    /// Build an id from an arena slot index. Slot `i` holds id `i + 1`.
    pub(crate) fn from_index(index: u8) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU8::new).map(Self)
    }

    /// Arena slot index this id maps to.
    pub(crate) fn index(self) -> u8 {
        self.0.get() - 1
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remaining-firings counter.
///
/// `Finite(n)` fires `n` more times; `Forever` never retires. `Finite(0)`
/// marks an event as cancelled: the next sweep that finds it due removes it
/// without firing. The update sweep never leaves a due `Finite(0)` event in
/// the schedule.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Repeat {
    /// Fire this many more times, then retire.
    Finite(u16),

    /// Fire on every due sweep, never retire.
    Forever,
}

impl Repeat {
    /// Check whether the event has no firings left.
    pub fn is_done(self) -> bool {
        matches!(self, Repeat::Finite(0))
    }

    /// Consume one firing. `Forever` and exhausted counters are unchanged.
    pub(crate) fn decrement(&mut self) {
        if let Repeat::Finite(n) = self
            && *n > 0
        {
            *n -= 1;
        }
    }

    /// Mark the event for removal at its next due visit.
    pub(crate) fn cancel(&mut self) {
        *self = Repeat::Finite(0);
    }
}

/// Action performed when an event fires.
///
/// Closed variant set dispatched by a single `match` in the update sweep —
/// no trait objects, no vtables.
pub(crate) enum Trigger<T> {
    /// Invoke a callback with the owning timer, so the callback can
    /// schedule or cancel events mid-sweep.
    Callback(fn(&mut T)),

    /// Write `state` to `pin`, then flip the stored state for the
    /// next firing.
    Pin {
        /// Pin number passed to the `DigitalOutput`.
        pin: u8,
        /// Level written at the next firing.
        state: PinState,
    },
}

// Manual Clone/Copy: `fn(&mut T)` is always `Copy`, so no `T` bound
// is needed (derive would add one).
impl<T> Clone for Trigger<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Trigger<T> {}

impl<T> fmt::Debug for Trigger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Callback(_) => f.debug_tuple("Callback").finish(),
            Trigger::Pin { pin, state } => f
                .debug_struct("Pin")
                .field("pin", pin)
                .field("state", state)
                .finish(),
        }
    }
}

/// One scheduled action, stored in an arena slot.
///
/// `prev`/`next` are slot indices into the owning arena, `None` at the list
/// ends. They are structural links only; the arena owns the event.
pub(crate) struct Event<T> {
    /// Last fire time, or creation time before the first firing (ms).
    pub(crate) start: u32,

    /// Interval between firings (ms); constant for the event's lifetime.
    pub(crate) period: u32,

    /// Remaining firings.
    pub(crate) repeat: Repeat,

    /// Action performed on each firing.
    pub(crate) trigger: Trigger<T>,

    /// Slot index of the previous event in sweep order.
    pub(crate) prev: Option<u8>,

    /// Slot index of the next event in sweep order.
    pub(crate) next: Option<u8>,
}

impl<T> Event<T> {
    /// Build an unlinked event; the list sets `prev`/`next` on append.
    pub(crate) fn new(start: u32, period: u32, repeat: Repeat, trigger: Trigger<T>) -> Self {
        Self {
            start,
            period,
            repeat,
            trigger,
            prev: None,
            next: None,
        }
    }

    /// Check whether the event is due at `now`.
    ///
    /// Wrapping subtraction makes the elapsed time correct across clock
    /// wraparound at the `u32` boundary.
    pub(crate) fn is_due(&self, now: u32) -> bool {
        now.wrapping_sub(self.start) >= self.period
    }
}

impl<T> Clone for Event<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Event<T> {}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("start", &self.start)
            .field("period", &self.period)
            .field("repeat", &self.repeat)
            .field("trigger", &self.trigger)
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}
