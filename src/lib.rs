//! # soft-timer
//!
//! Cooperative software timer for embedded systems with zero heap allocation.
//!
//! **Key features:**
//! - **Static allocation** - Fixed-capacity event arena, zero heap usage
//! - **Caller-driven** - No hardware timer interrupt; the application drives
//!   the engine by calling `update` from its main loop
//! - **Wraparound-safe** - All time math tolerates the `u32` millisecond
//!   counter wrapping
//! - **Flexible actions** - Callback invocation or pin toggling per event
//! - **Reentrancy-aware** - Callbacks may schedule or stop events mid-sweep
//!
//! Schedule callbacks with [`Timer::after`], [`Timer::every`] and
//! [`Timer::every_n`]; drive pins with [`Timer::oscillate`],
//! [`Timer::oscillate_n`] and [`Timer::pulse`]; cancel with [`Timer::stop`]
//! and [`Timer::stop_all`].
//!
//! The time source and pin driver are supplied by the application through the
//! [`Clock`] and [`DigitalOutput`] traits.
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;

// ============================================================================
// Module Declarations
// ============================================================================

// Platform abstraction (time source, pin output)
pub mod io;

// Error handling
pub mod error;

// Event data model
pub mod event;

// Intrusive event list over the slot arena
mod list;

// Timer orchestration
pub mod timer;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Platform traits
pub use io::{Clock, DigitalOutput, PinState};

// Error types
pub use error::TimerError;

// Event handles and repeat counters
pub use event::{EventId, Repeat};

// Timer engine
pub use timer::{Callback, Timer, MAX_EVENTS};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
