//! Process model.
//!
//! A process is a synthetic CPU-bound job with zero arrival time.
//! It needs `burst` units of CPU time in total and tracks how much
//! of that is still outstanding during playback.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable process identifier.
///
/// Assigned once at creation and never reused within a process set,
/// so segments can keep referring to a process after it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u64);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A process to be scheduled.
///
/// # Invariant
/// `remaining <= burst` outside of an in-flight playback segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique identifier.
    pub id: ProcessId,
    /// Display name.
    pub name: String,
    /// Total CPU time required (time units, ≥ 1).
    pub burst: u32,
    /// CPU time still outstanding during playback.
    pub remaining: u32,
    /// Display colour (cosmetic).
    pub color: String,
}

impl Process {
    /// Creates a process with full remaining time and no colour.
    pub fn new(id: ProcessId, name: impl Into<String>, burst: u32) -> Self {
        Self {
            id,
            name: name.into(),
            burst,
            remaining: burst,
            color: String::new(),
        }
    }

    /// Sets the display colour.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Whether playback has consumed all of this process's burst.
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// CPU time consumed so far during playback.
    pub fn executed(&self) -> u32 {
        self.burst.saturating_sub(self.remaining)
    }

    /// Consumes `amount` units of remaining time, flooring at zero.
    pub(crate) fn consume(&mut self, amount: u32) {
        self.remaining = self.remaining.saturating_sub(amount);
    }

    /// Restores remaining time to the full burst.
    pub(crate) fn restore(&mut self) {
        self.remaining = self.burst;
    }
}
