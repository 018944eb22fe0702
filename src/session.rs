//! Scheduling session: the boundary between callers and the engine.
//!
//! A session owns the process set, the quantum, the cached timeline,
//! and the player. The cached timeline is tagged with the process-set
//! version and quantum it was computed from; every accessor checks the
//! tag and recomputes on mismatch, so a stale trace is never observable.
//!
//! Any definition change (process edit or quantum change) also resets
//! playback, including while playing.

use rand::Rng;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::export::{trace_listing, TraceExport};
use crate::models::{Process, ProcessId, ProcessSet, Segment};
use crate::playback::{PlaybackState, PlaybackStatus, Player, TickOutcome};
use crate::scheduler::{compute_timeline, ScheduleMetrics, Timeline};
use crate::validation::coerce_time_units;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    version: u64,
    quantum: u32,
}

#[derive(Debug, Clone)]
struct CachedTimeline {
    stamp: Stamp,
    timeline: Timeline,
}

/// Owns processes, quantum, cached timeline, and playback.
///
/// # Example
///
/// ```
/// use rr_schedule::config::Config;
/// use rr_schedule::playback::PlaybackState;
/// use rr_schedule::session::Session;
///
/// let mut session = Session::try_new(Config::default())?;
/// session.add_process("P1", 4.0)?;
/// session.add_process("P2", 2.0)?;
/// session.set_quantum(3.0);
///
/// assert_eq!(session.timeline().total_time(), 6);
///
/// session.play(0.0);
/// let mut now = 0.0;
/// while session.status().playing {
///     now += 16.0;
///     session.tick(now);
/// }
/// assert_eq!(session.status().state, PlaybackState::Finished);
/// # Ok::<(), rr_schedule::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    processes: ProcessSet,
    quantum: u32,
    cache: Option<CachedTimeline>,
    player: Player,
}

impl Session {
    /// Creates an empty session.
    ///
    /// The config is not validated; out-of-range playback timing falls
    /// back to defaults (see [`Player::new`]). Use [`Session::try_new`]
    /// to reject such a config instead.
    pub fn new(config: Config) -> Self {
        let player = Player::new(&config);
        Self {
            quantum: config.default_quantum.max(1),
            config,
            processes: ProcessSet::new(),
            cache: None,
            player,
        }
    }

    /// Creates an empty session after validating `config`.
    pub fn try_new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Creates a session seeded with the default process set.
    pub fn with_default_processes(config: Config) -> Result<Self> {
        let mut session = Self::new(config);
        session.seed_default()?;
        Ok(session)
    }

    /// Creates a session around an existing process set.
    pub fn with_processes(config: Config, processes: ProcessSet) -> Self {
        let mut session = Self::new(config);
        session.processes = processes;
        session
    }

    /// Rebuilds a session from an exported artifact.
    ///
    /// Bursts and quantum are coerced to integers ≥ 1 (JSON parsing
    /// already truncates fractional and negative values); the embedded
    /// trace is ignored and recomputed on demand.
    pub fn from_export(config: Config, export: &TraceExport) -> Result<Self> {
        let mut session = Self::new(config);
        for summary in &export.processes {
            session
                .processes
                .add(&summary.name, summary.burst.max(1), &session.config)?;
        }
        session.quantum = export.quantum.max(1);
        debug!(
            processes = session.processes.len(),
            quantum = session.quantum,
            "imported session"
        );
        Ok(session)
    }

    /// Rebuilds a session from exported JSON.
    pub fn from_export_json(config: Config, json: &str) -> Result<Self> {
        let export = TraceExport::from_json(json)?;
        Self::from_export(config, &export)
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current processes (read-only; mutate through the session).
    pub fn processes(&self) -> &ProcessSet {
        &self.processes
    }

    /// Quantum in effect.
    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    // Process and quantum mutation

    /// Adds a process; `burst` is coerced to an integer ≥ 1.
    pub fn add_process(&mut self, name: &str, burst: f64) -> Result<ProcessId> {
        let id = self
            .processes
            .add(name, coerce_time_units(burst), &self.config)?;
        self.invalidate();
        Ok(id)
    }

    /// Changes a process's burst; `burst` is coerced to an integer ≥ 1.
    pub fn edit_burst(&mut self, id: ProcessId, burst: f64) -> Result<()> {
        self.processes.set_burst(id, coerce_time_units(burst))?;
        self.invalidate();
        Ok(())
    }

    /// Removes a process.
    pub fn remove_process(&mut self, id: ProcessId) -> Result<Process> {
        let removed = self.processes.remove(id)?;
        self.invalidate();
        Ok(removed)
    }

    /// Removes every process.
    pub fn clear_processes(&mut self) {
        self.processes.clear();
        self.invalidate();
    }

    /// Replaces the processes with the default seed set.
    pub fn seed_default(&mut self) -> Result<()> {
        self.processes.seed_default(&self.config)?;
        self.invalidate();
        Ok(())
    }

    /// Replaces the processes with a randomised batch.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        self.processes.randomize(rng, &self.config)?;
        self.invalidate();
        Ok(())
    }

    /// Sets the quantum; coerced to an integer ≥ 1.
    pub fn set_quantum(&mut self, quantum: f64) {
        self.quantum = coerce_time_units(quantum);
        self.invalidate();
    }

    // Trace access

    /// Whether the cached timeline matches the current processes and quantum.
    pub fn is_trace_valid(&self) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cached| cached.stamp == self.stamp())
    }

    /// The timeline for the current processes and quantum.
    pub fn timeline(&mut self) -> &Timeline {
        self.ensure_timeline()
    }

    /// Metrics for the current processes and quantum; `None` when empty.
    pub fn metrics(&mut self) -> Option<&ScheduleMetrics> {
        self.timeline().metrics()
    }

    /// Plain-text listing of the current trace.
    pub fn trace_listing(&mut self) -> String {
        trace_listing(self.timeline().segments())
    }

    /// Export artifact for the current processes, quantum, and trace.
    pub fn export(&mut self) -> TraceExport {
        self.ensure_timeline();
        TraceExport::new(self.processes.as_slice(), self.quantum, self.cached_segments())
    }

    /// Export artifact as pretty-printed JSON.
    pub fn export_json(&mut self) -> Result<String> {
        self.export().to_json()
    }

    // Playback

    /// Playback status snapshot.
    pub fn status(&self) -> PlaybackStatus {
        self.player.status()
    }

    /// Playback speed multiplier.
    pub fn speed_factor(&self) -> f64 {
        self.player.speed_factor()
    }

    /// Sets the playback speed multiplier; returns the factor applied.
    pub fn set_speed(&mut self, factor: f64) -> f64 {
        self.player.set_speed_factor(factor)
    }

    /// Starts or resumes playback at `now_ms`.
    ///
    /// Replaying after `Finished` starts over with fresh remaining times.
    pub fn play(&mut self, now_ms: f64) -> PlaybackStatus {
        self.ensure_timeline();
        if self.player.state() == PlaybackState::Finished {
            self.processes.restore_remaining();
        }
        let len = self.trace_len();
        self.player.play(now_ms, len)
    }

    /// Pauses playback.
    pub fn pause(&mut self) -> PlaybackStatus {
        self.player.pause()
    }

    /// Drives playback from the frame driver.
    ///
    /// A completed segment is charged against its process's remaining time.
    pub fn tick(&mut self, now_ms: f64) -> PlaybackStatus {
        if !self.player.is_playing() {
            return self.player.status();
        }
        self.ensure_timeline();
        let Some(cached) = &self.cache else {
            return self.player.status();
        };
        let outcome = self.player.tick(now_ms, cached.timeline.segments());

        if let Some(index) = outcome.completed() {
            if let Some(segment) = cached.timeline.segment(index) {
                let amount = u32::try_from(segment.duration).unwrap_or(u32::MAX);
                if !self.processes.consume(segment.pid, amount) {
                    warn!(pid = %segment.pid, "completed segment for a process no longer present");
                }
            }
        }
        if let TickOutcome::Finished(_) = outcome {
            debug!(total_time = cached.timeline.total_time(), "trace fully played");
        }
        self.player.status()
    }

    /// Moves the cursor one segment forward (inspection only).
    pub fn step_forward(&mut self) -> PlaybackStatus {
        self.ensure_timeline();
        let len = self.trace_len();
        self.player.step_forward(len)
    }

    /// Moves the cursor one segment back (inspection only).
    pub fn step_back(&mut self) -> PlaybackStatus {
        self.ensure_timeline();
        let len = self.trace_len();
        self.player.step_back(len)
    }

    /// Returns playback to `Idle` and restores remaining times.
    pub fn reset(&mut self) -> PlaybackStatus {
        self.processes.restore_remaining();
        self.player.reset()
    }

    /// Fraction of the current segment elapsed at `now_ms`.
    pub fn segment_progress(&mut self, now_ms: f64) -> f64 {
        self.ensure_timeline();
        self.player.progress(now_ms, self.cached_segments())
    }

    fn stamp(&self) -> Stamp {
        Stamp {
            version: self.processes.version(),
            quantum: self.quantum,
        }
    }

    fn trace_len(&self) -> usize {
        self.cached_segments().len()
    }

    fn cached_segments(&self) -> &[Segment] {
        self.cache
            .as_ref()
            .map(|c| c.timeline.segments())
            .unwrap_or_default()
    }

    fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            debug!("trace invalidated");
        }
        self.reset();
    }

    fn ensure_timeline(&mut self) -> &Timeline {
        let stamp = self.stamp();
        if self.cache.as_ref().is_some_and(|c| c.stamp != stamp) {
            self.cache = None;
        }
        if self.cache.is_none() {
            self.processes.restore_remaining();
        }

        let processes = &self.processes;
        let cached = self.cache.get_or_insert_with(|| {
            let timeline = compute_timeline(processes.as_slice(), stamp.quantum);
            debug!(
                version = stamp.version,
                quantum = stamp.quantum,
                segments = timeline.len(),
                "trace recomputed"
            );
            CachedTimeline { stamp, timeline }
        });
        &cached.timeline
    }
}
