//! Computed timeline (trace + metrics).
//!
//! A timeline is immutable once produced; recomputation replaces it
//! wholesale rather than patching segments in place.

use serde::Serialize;

use super::ScheduleMetrics;
use crate::models::{ProcessId, Segment};

/// The output of one scheduler run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    segments: Vec<Segment>,
    metrics: Option<ScheduleMetrics>,
    total_time: u64,
    quantum: u32,
}

impl Timeline {
    pub(crate) fn new(
        segments: Vec<Segment>,
        metrics: Option<ScheduleMetrics>,
        total_time: u64,
        quantum: u32,
    ) -> Self {
        Self {
            segments,
            metrics,
            total_time,
            quantum,
        }
    }

    /// Segments in production (and time) order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment at `index`, if any.
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the trace is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Metrics, or `None` for an empty process list.
    pub fn metrics(&self) -> Option<&ScheduleMetrics> {
        self.metrics.as_ref()
    }

    /// Clock value after the last segment ends.
    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    /// Quantum the timeline was computed with.
    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    /// All segments for a given process.
    pub fn segments_for(&self, pid: ProcessId) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.pid == pid).collect()
    }

    /// Number of times a process was dispatched.
    pub fn dispatch_count(&self, pid: ProcessId) -> usize {
        self.segments.iter().filter(|s| s.pid == pid).count()
    }

    /// Completion time for a process (latest end of its segments).
    pub fn completion_time(&self, pid: ProcessId) -> Option<u64> {
        self.segments
            .iter()
            .filter(|s| s.pid == pid)
            .map(Segment::end)
            .max()
    }

    /// Time tick coordinates: `0`, then the end of every segment.
    ///
    /// Empty for an empty trace.
    pub fn boundaries(&self) -> Vec<u64> {
        if self.segments.is_empty() {
            return Vec::new();
        }
        std::iter::once(0)
            .chain(self.segments.iter().map(Segment::end))
            .collect()
    }
}
