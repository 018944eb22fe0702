//! Segment (trace entry) model.
//!
//! A segment records one contiguous dispatch of a process. It is a
//! historical record: the process it names may since have been edited
//! or removed, so it carries snapshots of the name and colour.

use serde::{Deserialize, Serialize};

use super::ProcessId;

/// One contiguous execution slice within a trace.
///
/// Times are in engine time units relative to t=0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Process this slice belongs to (by value).
    pub pid: ProcessId,
    /// Process name at the time the trace was computed.
    pub name: String,
    /// Start time.
    pub start: u64,
    /// Length of the slice.
    pub duration: u64,
    /// Process colour at the time the trace was computed.
    pub color: String,
}

impl Segment {
    /// Creates a new segment.
    pub fn new(pid: ProcessId, name: impl Into<String>, start: u64, duration: u64) -> Self {
        Self {
            pid,
            name: name.into(),
            start,
            duration,
            color: String::new(),
        }
    }

    /// Sets the colour snapshot.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// End time (`start + duration`).
    #[inline]
    pub fn end(&self) -> u64 {
        self.start + self.duration
    }
}
