//! Fixed-quantum Round Robin scheduler.
//!
//! # Algorithm
//!
//! 1. Copy each burst into a working remaining counter.
//! 2. Queue all processes FIFO in their given order.
//! 3. Dequeue the head, run it for `min(remaining, quantum)`, emit a segment.
//! 4. Re-enqueue at the tail while work remains.
//! 5. Stop when the queue is empty; the clock is the total completion time.
//!
//! All arrivals are at t=0, so the CPU is never idle and segments are
//! contiguous. Ties are broken purely by queue order.
//!
//! # Complexity
//! O(Σ ceil(burst / quantum)) dispatches.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::{ScheduleMetrics, Timeline};
use crate::models::{Process, Segment};

/// Round Robin scheduler with a fixed time quantum.
///
/// # Example
///
/// ```
/// use rr_schedule::models::{Process, ProcessId};
/// use rr_schedule::scheduler::RoundRobinScheduler;
///
/// let processes = vec![
///     Process::new(ProcessId(0), "P1", 4),
///     Process::new(ProcessId(1), "P2", 6),
///     Process::new(ProcessId(2), "P3", 2),
/// ];
/// let timeline = RoundRobinScheduler::new(3).schedule(&processes);
/// assert_eq!(timeline.len(), 5);
/// assert_eq!(timeline.total_time(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobinScheduler {
    quantum: u32,
}

impl RoundRobinScheduler {
    /// Creates a scheduler. A zero quantum is raised to 1.
    pub fn new(quantum: u32) -> Self {
        Self {
            quantum: quantum.max(1),
        }
    }

    /// The time quantum in effect.
    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    /// Computes the full trace and metrics for `processes`.
    ///
    /// Pure: reads the processes, never mutates them, and returns
    /// identical output for identical input. An empty input yields an
    /// empty trace with no metrics.
    pub fn schedule(&self, processes: &[Process]) -> Timeline {
        let quantum = u64::from(self.quantum);
        let mut remaining: Vec<u64> = processes.iter().map(|p| u64::from(p.burst)).collect();
        let mut ready: VecDeque<usize> = (0..processes.len()).collect();
        let mut segments = Vec::new();
        let mut clock: u64 = 0;

        while let Some(idx) = ready.pop_front() {
            let process = &processes[idx];
            let exec = remaining[idx].min(quantum);

            trace!(pid = %process.id, start = clock, duration = exec, "dispatch");
            segments.push(
                Segment::new(process.id, process.name.as_str(), clock, exec)
                    .with_color(process.color.as_str()),
            );

            remaining[idx] -= exec;
            clock += exec;

            if remaining[idx] > 0 {
                ready.push_back(idx);
            }
        }

        let metrics = ScheduleMetrics::calculate(&segments, processes);

        debug!(
            processes = processes.len(),
            quantum = self.quantum,
            segments = segments.len(),
            total_time = clock,
            "computed round robin timeline"
        );

        Timeline::new(segments, metrics, clock, self.quantum)
    }
}

/// Computes a Round Robin timeline.
///
/// Shorthand for `RoundRobinScheduler::new(quantum).schedule(processes)`.
pub fn compute_timeline(processes: &[Process], quantum: u32) -> Timeline {
    RoundRobinScheduler::new(quantum).schedule(processes)
}
