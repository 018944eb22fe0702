//! Schedule performance metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Completion | End of the process's last segment |
//! | Turnaround | Completion − arrival (arrival is always 0) |
//! | Waiting | Turnaround − burst |
//! | Averages | Arithmetic mean over all processes |
//!
//! Metrics are only defined for a non-empty process list; the empty case
//! yields `None` instead of dividing by zero.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Process, ProcessId, Segment};

/// Per-process metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process identifier.
    pub pid: ProcessId,
    /// Process name.
    pub name: String,
    /// Original burst.
    pub burst: u32,
    /// Completion time.
    pub completion: u64,
    /// Turnaround time.
    pub turnaround: u64,
    /// Waiting time.
    pub waiting: u64,
}

/// Aggregate metrics for one timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Per-process metrics, in process order.
    pub processes: Vec<ProcessMetrics>,
    /// Mean waiting time.
    pub average_waiting: f64,
    /// Mean turnaround time.
    pub average_turnaround: f64,
    /// Clock value after the last segment.
    pub total_time: u64,
}

impl ScheduleMetrics {
    /// Derives metrics from a trace and the processes it was computed from.
    ///
    /// Returns `None` when `processes` is empty.
    pub fn calculate(segments: &[Segment], processes: &[Process]) -> Option<Self> {
        if processes.is_empty() {
            return None;
        }

        let mut completion: HashMap<ProcessId, u64> = HashMap::new();
        for seg in segments {
            let entry = completion.entry(seg.pid).or_insert(0);
            *entry = (*entry).max(seg.end());
        }

        let per_process: Vec<ProcessMetrics> = processes
            .iter()
            .map(|p| {
                let done = completion.get(&p.id).copied().unwrap_or(0);
                ProcessMetrics {
                    pid: p.id,
                    name: p.name.clone(),
                    burst: p.burst,
                    completion: done,
                    turnaround: done,
                    waiting: done.saturating_sub(u64::from(p.burst)),
                }
            })
            .collect();

        let n = per_process.len() as f64;
        let total_waiting: u64 = per_process.iter().map(|m| m.waiting).sum();
        let total_turnaround: u64 = per_process.iter().map(|m| m.turnaround).sum();
        let total_time = segments.iter().map(Segment::end).max().unwrap_or(0);

        Some(Self {
            processes: per_process,
            average_waiting: total_waiting as f64 / n,
            average_turnaround: total_turnaround as f64 / n,
            total_time,
        })
    }

    /// Metrics for a given process.
    pub fn for_process(&self, pid: ProcessId) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|m| m.pid == pid)
    }

    /// Average waiting time to two decimals.
    pub fn average_waiting_display(&self) -> String {
        format!("{:.2}", self.average_waiting)
    }

    /// Average turnaround time to two decimals.
    pub fn average_turnaround_display(&self) -> String {
        format!("{:.2}", self.average_turnaround)
    }
}
