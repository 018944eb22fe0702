//! Trace export artifact and text listing.
//!
//! The artifact shape is:
//!
//! ```json
//! {
//!   "processes": [{ "name": "P1", "burst": 4 }],
//!   "quantum": 3,
//!   "trace": [{ "pid": 0, "name": "P1", "start": 0, "duration": 3 }]
//! }
//! ```
//!
//! On import, `burst` and `quantum` accept any JSON number and are coerced
//! the same way interactive input is: truncated, with anything below 1
//! raised to 1.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::models::{Process, ProcessId, Segment};
use crate::validation::coerce_time_units;

/// Process definition as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSummary {
    /// Display name.
    pub name: String,
    /// CPU burst in time units (≥ 1 after import).
    #[serde(deserialize_with = "time_units")]
    pub burst: u32,
}

/// Segment as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Process that ran.
    pub pid: ProcessId,
    /// Process name at scheduling time.
    pub name: String,
    /// Start time in time units.
    pub start: u64,
    /// Length in time units.
    pub duration: u64,
}

/// Serializable snapshot of a workload and its trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceExport {
    /// Process definitions in queue order.
    pub processes: Vec<ProcessSummary>,
    /// Quantum in time units (≥ 1 after import).
    #[serde(deserialize_with = "time_units")]
    pub quantum: u32,
    /// Trace at export time. Informational; import recomputes it.
    pub trace: Vec<SegmentRecord>,
}

fn time_units<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(coerce_time_units)
}

impl TraceExport {
    /// Builds an export from processes, quantum, and trace.
    pub fn new(processes: &[Process], quantum: u32, segments: &[Segment]) -> Self {
        Self {
            processes: processes
                .iter()
                .map(|p| ProcessSummary {
                    name: p.name.clone(),
                    burst: p.burst,
                })
                .collect(),
            quantum,
            trace: segments
                .iter()
                .map(|s| SegmentRecord {
                    pid: s.pid,
                    name: s.name.clone(),
                    start: s.start,
                    duration: s.duration,
                })
                .collect(),
        }
    }

    /// Pretty-printed JSON (two-space indent).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses an exported JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Numbered, one-line-per-segment listing of a trace.
///
/// Returns `"No trace."` for an empty trace.
pub fn trace_listing(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "No trace.".to_string();
    }
    segments
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. {} - start: {}, dur: {}\n",
                i + 1,
                s.name,
                s.start,
                s.duration
            )
        })
        .collect()
}
