//! Round Robin scheduling and metrics.
//!
//! # Algorithm
//!
//! `RoundRobinScheduler` runs fixed-quantum Round Robin on a single CPU
//! with every process arriving at t=0. It is a pure function of the
//! process list and the quantum.
//!
//! # Metrics
//!
//! `ScheduleMetrics` derives completion, turnaround, and waiting time per
//! process, plus their means and the total completion time.
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5.3
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

mod metrics;
mod round_robin;
mod timeline;

pub use metrics::{ProcessMetrics, ScheduleMetrics};
pub use round_robin::{compute_timeline, RoundRobinScheduler};
pub use timeline::Timeline;
