//! Scheduling domain models.
//!
//! Provides the core data types for a single-CPU Round Robin workload:
//! the processes being scheduled and the segments a schedule is made of.
//!
//! | Type | Role |
//! |------|------|
//! | `Process` | Job with a burst and a live remaining counter |
//! | `ProcessSet` | Owned, versioned collection of processes |
//! | `Segment` | One dispatch of a process, immutable once produced |

mod process;
mod process_set;
mod segment;

pub use process::{Process, ProcessId};
pub use process_set::{ProcessSet, DEFAULT_SEED_BURSTS};
pub use segment::Segment;
