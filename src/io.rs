//! Platform abstraction traits for time and pin output.
//!
//! The timer core never talks to hardware directly. A `Clock` supplies the
//! millisecond counter and a `DigitalOutput` performs pin writes, so the same
//! engine runs against a SysTick counter, an RTC, or a test mock.

/// Monotonic millisecond time source.
///
/// The counter wraps silently at the `u32` boundary; all time arithmetic in
/// the core uses wrapping subtraction, so wraparound needs no special
/// handling by implementors.
pub trait Clock {
    /// Current time in milliseconds since an arbitrary epoch.
    fn now(&mut self) -> u32;
}

/// Digital pin output sink.
///
/// Fire-and-forget: writes are assumed to always succeed, matching bare-metal
/// GPIO registers where a write cannot fail.
pub trait DigitalOutput {
    /// Drive `pin` to `level`.
    fn write(&mut self, pin: u8, level: PinState);
}

/// Logic level of a digital pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinState {
    /// Logic low
    Low,

    /// Logic high
    High,
}

impl PinState {
    /// The opposite level.
    pub fn toggle(self) -> Self {
        match self {
            PinState::Low => PinState::High,
            PinState::High => PinState::Low,
        }
    }

    /// Check if this level is high.
    pub fn is_high(self) -> bool {
        matches!(self, PinState::High)
    }
}
