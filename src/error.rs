//! Error types for timer operations.
//!
//! The engine has no recoverable internal errors: an operation either
//! completes, or (for event creation) reports that no event was created.

use core::fmt;

/// Timer error type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// All event slots are in use; no event was created.
    ///
    /// The id space has a hard upper bound of 255 concurrent events, further
    /// limited by the capacity the timer was instantiated with. Events free
    /// their slots when they retire, so a later creation attempt may succeed.
    Exhausted,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::Exhausted => write!(f, "Event capacity exhausted"),
        }
    }
}
