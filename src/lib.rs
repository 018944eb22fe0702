//! Round Robin CPU scheduling engine with step-by-step playback.
//!
//! Turns a list of synthetic processes (all arriving at t=0) and a time
//! quantum into an ordered trace of execution segments plus performance
//! metrics, then replays that trace under variable speed, stepping, and
//! pause/resume. Rendering and input handling are left to the caller.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Process`, `ProcessSet`, `Segment`
//! - **`scheduler`**: `RoundRobinScheduler`, `Timeline`, `ScheduleMetrics`
//! - **`playback`**: `Player` state machine driven by frame timestamps
//! - **`session`**: `Session`, which keeps trace and processes in sync
//! - **`export`**: JSON trace artifact and text listing
//! - **`validation`**: Input coercion and process list checks
//! - **`config`**: Tunables (time scale, speed range, palette)
//!
//! # Architecture
//!
//! Data flows one way. Process and quantum edits bump a version on the
//! session; the session recomputes the timeline whenever its cached copy
//! is stale, and the player only ever reads the current trace.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod playback;
pub mod scheduler;
pub mod session;
pub mod validation;

pub use error::{Error, Result};
