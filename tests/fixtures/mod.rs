//! Test fixtures and utilities for soft-timer testing.
//!
//! Provides:
//! - `MockClock`: Manually stepped implementation of the `Clock` trait
//! - `MockPins`: `DigitalOutput` implementation that records every write
//! - `TestTimer`: Timer type alias wired to the mocks
//! - Helper functions for common test scenarios

#![allow(dead_code)]

use soft_timer::{Clock, DigitalOutput, PinState, Timer};

// ============================================================================
// MockClock - Manually Stepped Time Source
// ============================================================================

/// Mock millisecond clock under full test control.
///
/// Time only moves when the test says so, which makes every due-time
/// calculation deterministic.
#[derive(Debug)]
pub struct MockClock {
    now: u32,
}

impl MockClock {
    /// Create a clock starting at time zero.
    pub fn new() -> Self {
        Self { now: 0 }
    }

    /// Create a clock starting at an arbitrary time (useful for
    /// wraparound scenarios).
    pub fn starting_at(now: u32) -> Self {
        Self { now }
    }

    /// Jump to an absolute time.
    pub fn set(&mut self, now: u32) {
        self.now = now;
    }

    /// Advance by `ms`, wrapping at the u32 boundary like real hardware.
    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&mut self) -> u32 {
        self.now
    }
}

// ============================================================================
// MockPins - Recording Pin Driver
// ============================================================================

/// Mock pin driver that captures every write in order.
#[derive(Debug, Default)]
pub struct MockPins {
    writes: Vec<(u8, PinState)>,
}

impl MockPins {
    /// Create a driver with no recorded writes.
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// All writes so far, in order.
    pub fn writes(&self) -> &[(u8, PinState)] {
        &self.writes
    }

    /// Levels written to one pin, in order.
    pub fn levels_for(&self, pin: u8) -> Vec<PinState> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
            .collect()
    }

    /// Forget recorded writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl DigitalOutput for MockPins {
    fn write(&mut self, pin: u8, level: PinState) {
        self.writes.push((pin, level));
    }
}

// ============================================================================
// Timer Creation Helpers
// ============================================================================

/// Timer wired to the mock clock and pin driver.
pub type TestTimer<const N: usize = 16> = Timer<MockClock, MockPins, N>;

/// Create a test timer with the default test capacity, clock at zero.
pub fn create_timer() -> TestTimer {
    Timer::new(MockClock::new(), MockPins::new())
}

/// Create a test timer with explicit capacity, clock at zero.
pub fn create_timer_with_capacity<const N: usize>() -> TestTimer<N> {
    Timer::new(MockClock::new(), MockPins::new())
}

/// Create a test timer whose clock starts at `now`.
pub fn create_timer_at(now: u32) -> TestTimer {
    Timer::new(MockClock::starting_at(now), MockPins::new())
}
