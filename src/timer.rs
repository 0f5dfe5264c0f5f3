//! Cooperative timer engine.
//!
//! [`Timer`] owns the event arena, a [`Clock`] and a [`DigitalOutput`], and
//! exposes the scheduling surface: `after`, `every`, `every_n`, `oscillate`,
//! `oscillate_n`, `pulse`, `stop`, `stop_all` and the `update` sweep.
//!
//! The engine is fully cooperative: nothing fires until the caller invokes
//! [`Timer::update`] (or [`Timer::update_at`]), and every operation runs to
//! completion before returning. No interrupts, no threads, no blocking.

use heapless::Vec;

use crate::error::TimerError;
use crate::event::{Event, EventId, Repeat, Trigger};
use crate::io::{Clock, DigitalOutput, PinState};
use crate::list::EventList;

/// Largest supported concurrent-event capacity (the full id space 1..=255).
pub const MAX_EVENTS: usize = 255;

/// Callback invoked when an event fires.
///
/// The callback receives the owning timer, so it may schedule new events or
/// stop existing ones while the update sweep is mid-traversal; see
/// [`Timer::update_at`] for the ordering guarantees.
pub type Callback<C, P, const N: usize> = fn(&mut Timer<C, P, N>);

/// Cooperative software timer.
///
/// Schedules up to `N` concurrent events (default 255, the full id space)
/// and fires them from the caller-driven `update` sweep. Events fire in
/// creation order within a sweep.
///
/// # Example
///
/// ```
/// use soft_timer::{Clock, DigitalOutput, PinState, Timer};
///
/// struct TickClock(u32);
/// impl Clock for TickClock {
///     fn now(&mut self) -> u32 { self.0 }
/// }
///
/// struct NoPins;
/// impl DigitalOutput for NoPins {
///     fn write(&mut self, _pin: u8, _level: PinState) {}
/// }
///
/// let mut timer: Timer<_, _> = Timer::new(TickClock(0), NoPins);
/// timer.every(1000, |_| { /* fires every second */ }).unwrap();
/// timer.update_at(1000); // drive the sweep
/// ```
pub struct Timer<C, P, const N: usize = MAX_EVENTS> {
    events: EventList<Self, N>,
    clock: C,
    pins: P,
}

impl<C: Clock, P: DigitalOutput, const N: usize> Timer<C, P, N> {
    /// Create a timer that reads time from `clock` and drives pins
    /// through `pins`.
    pub fn new(clock: C, pins: P) -> Self {
        Self {
            events: EventList::new(),
            clock,
            pins,
        }
    }

    // ========================================================================
    // Event creation
    // ========================================================================

    /// Schedule `callback` to fire once, `duration` ms from now.
    pub fn after(&mut self, duration: u32, callback: Callback<C, P, N>) -> Result<EventId, TimerError> {
        self.schedule(duration, Repeat::Finite(1), Trigger::Callback(callback))
    }

    /// Schedule `callback` to fire every `period` ms, forever.
    pub fn every(&mut self, period: u32, callback: Callback<C, P, N>) -> Result<EventId, TimerError> {
        self.schedule(period, Repeat::Forever, Trigger::Callback(callback))
    }

    /// Schedule `callback` to fire every `period` ms, `count` times.
    pub fn every_n(
        &mut self,
        period: u32,
        callback: Callback<C, P, N>,
        count: u16,
    ) -> Result<EventId, TimerError> {
        self.schedule(period, Repeat::Finite(count), Trigger::Callback(callback))
    }

    /// Toggle `pin` every `period` ms, forever, starting from `level`.
    ///
    /// Writes `level` immediately; each subsequent due sweep writes the
    /// alternate level.
    pub fn oscillate(&mut self, pin: u8, period: u32, level: PinState) -> Result<EventId, TimerError> {
        let id = self.schedule(period, Repeat::Forever, Trigger::Pin { pin, state: level })?;
        self.fire(id.index());
        Ok(id)
    }

    /// Toggle `pin` every `period` ms for `count` full on/off repetitions,
    /// starting from `level`.
    ///
    /// Writes `level` immediately. Each repetition is two pin writes, and
    /// the immediate write consumes one, so the remaining-firings counter is
    /// `count * 2 - 1`. A `count` of zero produces only the immediate write.
    pub fn oscillate_n(
        &mut self,
        pin: u8,
        period: u32,
        level: PinState,
        count: u16,
    ) -> Result<EventId, TimerError> {
        let firings = count.saturating_mul(2).saturating_sub(1);
        let id = self.schedule(period, Repeat::Finite(firings), Trigger::Pin { pin, state: level })?;
        self.fire(id.index());
        Ok(id)
    }

    /// Emit a single pulse on `pin`: write `level` immediately, then the
    /// complementary level once, `period` ms later.
    pub fn pulse(&mut self, pin: u8, period: u32, level: PinState) -> Result<EventId, TimerError> {
        let id = self.schedule(period, Repeat::Finite(1), Trigger::Pin { pin, state: level })?;
        self.fire(id.index());
        Ok(id)
    }

    /// Allocate a slot and append the new event at the tail.
    ///
    /// On exhaustion no event is created and no partial state is left
    /// behind. A zero `period` is not validated: such an event is due on
    /// every sweep until its counter runs out.
    fn schedule(
        &mut self,
        period: u32,
        repeat: Repeat,
        trigger: Trigger<Self>,
    ) -> Result<EventId, TimerError> {
        let start = self.clock.now();
        self.events.insert(Event::new(start, period, repeat, trigger))
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Cancel the event with `id`.
    ///
    /// The counter is forced to zero; the event stops firing immediately,
    /// but its slot is reclaimed lazily by the next sweep that finds it due.
    /// An id that no longer names a live event is silently ignored.
    pub fn stop(&mut self, id: EventId) {
        if let Some(event) = self.events.get_mut(id.index()) {
            event.repeat.cancel();
        }
    }

    /// Cancel every scheduled event. Slot reclamation is deferred to later
    /// sweeps, the same as [`Timer::stop`].
    pub fn stop_all(&mut self) {
        let mut cursor = self.events.head();
        while let Some(slot) = cursor {
            match self.events.get_mut(slot) {
                Some(event) => {
                    event.repeat.cancel();
                    cursor = event.next;
                }
                None => break,
            }
        }
    }

    // ========================================================================
    // Update sweep
    // ========================================================================

    /// Run one sweep at the current clock time.
    pub fn update(&mut self) {
        let now = self.clock.now();
        self.update_at(now);
    }

    /// Run one sweep at an explicit time.
    ///
    /// Walks events in creation order and fires every due one (elapsed time
    /// since its last firing ≥ its period, computed with wrapping arithmetic
    /// so clock wraparound is handled). After all firing is done, each due
    /// event's counter is decremented; exhausted events are removed (freeing
    /// their id) and surviving ones have `start` advanced by exactly one
    /// period. An event overdue by several periods therefore fires once per
    /// sweep, closing its deficit gradually rather than bursting.
    ///
    /// A firing callback may mutate the schedule: events it stops will not
    /// fire later in this sweep, and events it creates are appended at the
    /// tail and fire in this same sweep if already due.
    pub fn update_at(&mut self, now: u32) {
        // Due slots in firing order. Bounded by the arena capacity: nothing
        // is removed until the unwind, so no slot is visited twice.
        let mut due: Vec<u8, N> = Vec::new();

        let mut cursor = self.events.head();
        while let Some(slot) = cursor {
            let Some(event) = self.events.get(slot) else {
                break;
            };
            if event.is_due(now) {
                let live = !event.repeat.is_done();
                let _ = due.push(slot);
                if live {
                    self.fire(slot);
                }
                // Re-read the link after firing: a callback may have
                // appended a new tail behind this node.
                cursor = self.events.get(slot).and_then(|event| event.next);
            } else {
                cursor = event.next;
            }
        }

        // Unwind in reverse firing order: consume one firing per due event,
        // retire exhausted events, single-step the survivors.
        for &slot in due.iter().rev() {
            let retired = match self.events.get_mut(slot) {
                Some(event) => {
                    event.repeat.decrement();
                    if event.repeat.is_done() {
                        true
                    } else {
                        event.start = event.start.wrapping_add(event.period);
                        false
                    }
                }
                None => continue,
            };
            if retired {
                self.events.remove(slot);
            }
        }
    }

    /// Execute the trigger action of the event in `slot`.
    fn fire(&mut self, slot: u8) {
        let Some(trigger) = self.events.get(slot).map(|event| event.trigger) else {
            return;
        };
        match trigger {
            Trigger::Callback(callback) => callback(self),
            Trigger::Pin { pin, state } => {
                self.pins.write(pin, state);
                if let Some(event) = self.events.get_mut(slot)
                    && let Trigger::Pin { state, .. } = &mut event.trigger
                {
                    *state = state.toggle();
                }
            }
        }
    }

    // ========================================================================
    // Inspection & access
    // ========================================================================

    /// Number of scheduled events, including stopped ones awaiting removal.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no events are scheduled.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Check whether `id` names a live event.
    ///
    /// Stopped events count as live until a sweep reclaims their slot.
    pub fn contains(&self, id: EventId) -> bool {
        self.events.get(id.index()).is_some()
    }

    /// Borrow the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutably borrow the clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Borrow the pin output driver.
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Mutably borrow the pin output driver.
    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }
}

impl<C: core::fmt::Debug, P: core::fmt::Debug, const N: usize> core::fmt::Debug for Timer<C, P, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timer")
            .field("events", &self.events)
            .field("clock", &self.clock)
            .field("pins", &self.pins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    struct FixedClock(u32);

    impl Clock for FixedClock {
        fn now(&mut self) -> u32 {
            self.0
        }
    }

    struct NullPins;

    impl DigitalOutput for NullPins {
        fn write(&mut self, _pin: u8, _level: PinState) {}
    }

    fn timer() -> Timer<FixedClock, NullPins, 8> {
        Timer::new(FixedClock(0), NullPins)
    }

    #[test]
    fn test_after_fires_once_and_retires() {
        static FIRED: AtomicU32 = AtomicU32::new(0);
        FIRED.store(0, Ordering::SeqCst);

        let mut timer = timer();
        let id = timer.after(100, |_| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        timer.update_at(99);
        assert_eq!(FIRED.load(Ordering::SeqCst), 0);
        assert!(timer.contains(id));

        timer.update_at(100);
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
        assert!(!timer.contains(id));

        // Long after the deadline, nothing fires again
        timer.update_at(10_000);
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_single_step_catch_up() {
        static FIRED: AtomicU32 = AtomicU32::new(0);
        FIRED.store(0, Ordering::SeqCst);

        let mut timer = timer();
        timer.every(10, |_| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        // Overdue by five periods: one firing per sweep, not a burst
        timer.update_at(50);
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
        timer.update_at(50);
        assert_eq!(FIRED.load(Ordering::SeqCst), 2);
        timer.update_at(50);
        assert_eq!(FIRED.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_stop_unknown_id_is_noop() {
        let mut timer = timer();
        let id = timer.after(10, |_| {}).unwrap();
        timer.update_at(10); // retires the event, frees the id

        timer.stop(id); // stale id - silently ignored
        assert!(timer.is_empty());
    }

    #[test]
    fn test_stopped_event_removed_lazily() {
        let mut timer = timer();
        let id = timer.every(10, |_| {}).unwrap();

        timer.stop(id);
        // Still occupying its slot until a sweep finds it due
        assert_eq!(timer.len(), 1);

        timer.update_at(5);
        assert_eq!(timer.len(), 1); // not due yet

        timer.update_at(10);
        assert!(timer.is_empty());
    }

    #[test]
    fn test_stop_all_cancels_everything() {
        static FIRED: AtomicU32 = AtomicU32::new(0);
        FIRED.store(0, Ordering::SeqCst);

        let mut timer = timer();
        timer.every(10, |_| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        timer.after(20, |_| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        timer.stop_all();
        timer.update_at(100);
        timer.update_at(200);

        assert_eq!(FIRED.load(Ordering::SeqCst), 0);
        assert!(timer.is_empty());
    }

    #[test]
    fn test_update_reads_owned_clock() {
        static FIRED: AtomicU32 = AtomicU32::new(0);
        FIRED.store(0, Ordering::SeqCst);

        let mut timer = timer();
        timer.after(100, |_| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        timer.clock_mut().0 = 50;
        timer.update();
        assert_eq!(FIRED.load(Ordering::SeqCst), 0);

        timer.clock_mut().0 = 100;
        timer.update();
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_period_fires_every_sweep() {
        static FIRED: AtomicU32 = AtomicU32::new(0);
        FIRED.store(0, Ordering::SeqCst);

        let mut timer = timer();
        timer.every_n(0, |_| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        }, 3)
        .unwrap();

        timer.update_at(0);
        timer.update_at(0);
        timer.update_at(0);
        timer.update_at(0);

        assert_eq!(FIRED.load(Ordering::SeqCst), 3);
        assert!(timer.is_empty());
    }

    #[test]
    fn test_wraparound_due_time() {
        static FIRED: AtomicU32 = AtomicU32::new(0);
        FIRED.store(0, Ordering::SeqCst);

        let mut timer: Timer<FixedClock, NullPins, 8> = Timer::new(FixedClock(u32::MAX - 9), NullPins);
        timer.after(20, |_| {
            FIRED.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        // 9 ms elapsed, crossing the wrap point
        timer.update_at(u32::MAX);
        assert_eq!(FIRED.load(Ordering::SeqCst), 0);

        // 18 ms elapsed (now = start + 18, wrapped)
        timer.update_at(8);
        assert_eq!(FIRED.load(Ordering::SeqCst), 0);

        // Exactly 20 ms elapsed
        timer.update_at(10);
        assert_eq!(FIRED.load(Ordering::SeqCst), 1);
    }
}
