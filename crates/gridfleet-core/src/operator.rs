//! Operator control: the external stop signal and why a run ended.
//!
//! The stop signal is the only state shared across threads. The engine's
//! Ctrl-C handler raises it; the tick driver polls it at the start of
//! every tick and ends the run cleanly when it is set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// The stop signal was raised.
    StopRequested,
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
}

/// A cloneable, thread-safe stop flag.
///
/// All clones share one flag. Once raised it stays raised.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    /// Set once a stop has been requested.
    raised: Arc<AtomicBool>,
}

impl StopSignal {
    /// Create a lowered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Safe to call from any thread, any number of times.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
