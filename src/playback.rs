//! Playback state machine for a computed trace.
//!
//! The player replays segments against wall-clock time supplied by an
//! external frame driver. It never reads a clock itself: every time-based
//! operation takes `now_ms`, so tests can feed synthetic timestamps.
//!
//! # States
//!
//! | State | Meaning |
//! |-------|---------|
//! | `Idle` | Index 0, not playing (initial, after reset) |
//! | `Paused` | Valid index, not playing |
//! | `Playing` | Advancing on `tick` |
//! | `Finished` | Index at last segment after natural completion |
//!
//! # Invariants
//!
//! 1. `current_index < len` whenever the trace is non-empty.
//! 2. At most one segment completes per `tick`.
//! 3. Pausing discards in-segment progress; resuming restarts the
//!    current segment's timer.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, DEFAULT_BASE_UNIT_MS};
use crate::models::Segment;

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// At the start, not playing.
    Idle,
    /// Stopped at a valid index.
    Paused,
    /// Advancing through segments.
    Playing,
    /// Reached the end by natural completion.
    Finished,
}

/// Snapshot handed back to the renderer after each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    /// Index of the highlighted segment.
    pub current_index: usize,
    /// Whether the driver should keep ticking.
    pub playing: bool,
    /// Current state.
    pub state: PlaybackState,
}

/// Result of a single `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; the tick did nothing.
    Inactive,
    /// The current segment is still running.
    Waiting,
    /// The segment at this index completed and the next one started.
    Advanced(usize),
    /// The segment at this index completed and it was the last one.
    Finished(usize),
}

impl TickOutcome {
    /// Index of the segment completed by this tick, if any.
    pub fn completed(self) -> Option<usize> {
        match self {
            TickOutcome::Advanced(i) | TickOutcome::Finished(i) => Some(i),
            TickOutcome::Inactive | TickOutcome::Waiting => None,
        }
    }
}

/// Cursor, play/pause status, and speed over a segment trace.
#[derive(Debug, Clone)]
pub struct Player {
    current_index: usize,
    state: PlaybackState,
    speed_factor: f64,
    segment_started_at: Option<f64>,
    base_unit_ms: f64,
    min_speed_factor: f64,
    max_speed_factor: f64,
}

impl Player {
    /// Creates an idle player at speed 1 (clamped into the configured range).
    ///
    /// A base unit that is not finite and positive falls back to
    /// [`DEFAULT_BASE_UNIT_MS`]; an unusable speed range falls back to the
    /// default range.
    pub fn new(config: &Config) -> Self {
        let base_unit_ms = if config.base_unit_ms.is_finite() && config.base_unit_ms > 0.0 {
            config.base_unit_ms
        } else {
            warn!(
                base_unit_ms = config.base_unit_ms,
                fallback = DEFAULT_BASE_UNIT_MS,
                "unusable base unit, using default"
            );
            DEFAULT_BASE_UNIT_MS
        };

        let (min, max) = (config.min_speed_factor, config.max_speed_factor);
        let (min_speed_factor, max_speed_factor) =
            if min.is_finite() && min > 0.0 && max.is_finite() && min <= max {
                (min, max)
            } else {
                let defaults = Config::default();
                warn!(min, max, "unusable speed range, using default");
                (defaults.min_speed_factor, defaults.max_speed_factor)
            };

        Self {
            current_index: 0,
            state: PlaybackState::Idle,
            speed_factor: 1.0f64.max(min_speed_factor).min(max_speed_factor),
            segment_started_at: None,
            base_unit_ms,
            min_speed_factor,
            max_speed_factor,
        }
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the highlighted segment.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Whether the player is advancing.
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Playback rate multiplier.
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Status snapshot for the renderer.
    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            current_index: self.current_index,
            playing: self.is_playing(),
            state: self.state,
        }
    }

    /// Sets the speed factor, clamped into the configured range.
    ///
    /// Non-finite or non-positive requests are ignored. Takes effect on the
    /// next tick without restarting the current segment's clock.
    /// Returns the factor now in effect.
    pub fn set_speed_factor(&mut self, factor: f64) -> f64 {
        if !factor.is_finite() || factor <= 0.0 {
            warn!(factor, "ignoring non-positive speed factor");
            return self.speed_factor;
        }
        let clamped = factor
            .max(self.min_speed_factor)
            .min(self.max_speed_factor);
        if clamped != factor {
            warn!(requested = factor, applied = clamped, "speed factor clamped");
        }
        self.speed_factor = clamped;
        clamped
    }

    /// Wall-clock display duration of a segment at the current speed.
    pub fn display_duration_ms(&self, segment: &Segment) -> f64 {
        segment.duration as f64 * self.base_unit_ms / self.speed_factor
    }

    /// Starts playing from the current index.
    ///
    /// No-op on an empty trace. From `Finished` the cursor rewinds to 0.
    pub fn play(&mut self, now_ms: f64, len: usize) -> PlaybackStatus {
        if len == 0 {
            return self.status();
        }
        if self.state == PlaybackState::Finished || self.current_index >= len {
            self.current_index = 0;
        }
        self.state = PlaybackState::Playing;
        self.segment_started_at = Some(now_ms);
        debug!(index = self.current_index, now_ms, "playback started");
        self.status()
    }

    /// Pauses playback, discarding in-segment progress.
    pub fn pause(&mut self) -> PlaybackStatus {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            self.segment_started_at = None;
            debug!(index = self.current_index, "playback paused");
        }
        self.status()
    }

    /// Advances playback against the frame timestamp `now_ms`.
    pub fn tick(&mut self, now_ms: f64, segments: &[Segment]) -> TickOutcome {
        if self.state != PlaybackState::Playing {
            return TickOutcome::Inactive;
        }
        let Some(segment) = segments.get(self.current_index) else {
            self.finish(segments.len());
            return TickOutcome::Inactive;
        };

        let started = *self.segment_started_at.get_or_insert(now_ms);
        let elapsed = now_ms - started;
        if elapsed < self.display_duration_ms(segment) {
            return TickOutcome::Waiting;
        }

        let completed = self.current_index;
        self.current_index += 1;
        self.segment_started_at = Some(now_ms);

        if self.current_index >= segments.len() {
            self.finish(segments.len());
            TickOutcome::Finished(completed)
        } else {
            TickOutcome::Advanced(completed)
        }
    }

    /// Moves the cursor one segment forward. Ignored while playing.
    pub fn step_forward(&mut self, len: usize) -> PlaybackStatus {
        if self.state != PlaybackState::Playing && len > 0 {
            self.current_index = (self.current_index + 1).min(len - 1);
            self.state = PlaybackState::Paused;
            self.segment_started_at = None;
        }
        self.status()
    }

    /// Moves the cursor one segment back. Ignored while playing.
    pub fn step_back(&mut self, len: usize) -> PlaybackStatus {
        if self.state != PlaybackState::Playing && len > 0 {
            self.current_index = self.current_index.saturating_sub(1).min(len - 1);
            self.state = PlaybackState::Paused;
            self.segment_started_at = None;
        }
        self.status()
    }

    /// Returns to `Idle` at index 0.
    pub fn reset(&mut self) -> PlaybackStatus {
        self.current_index = 0;
        self.state = PlaybackState::Idle;
        self.segment_started_at = None;
        self.status()
    }

    /// Fraction of the current segment elapsed at `now_ms`, in `[0, 1]`.
    pub fn progress(&self, now_ms: f64, segments: &[Segment]) -> f64 {
        match self.state {
            PlaybackState::Finished => 1.0,
            PlaybackState::Playing => {
                let (Some(segment), Some(started)) =
                    (segments.get(self.current_index), self.segment_started_at)
                else {
                    return 0.0;
                };
                let total = self.display_duration_ms(segment);
                if total <= 0.0 {
                    return 1.0;
                }
                ((now_ms - started) / total).clamp(0.0, 1.0)
            }
            PlaybackState::Idle | PlaybackState::Paused => 0.0,
        }
    }

    fn finish(&mut self, len: usize) {
        self.current_index = len.saturating_sub(1);
        self.state = PlaybackState::Finished;
        self.segment_started_at = None;
        debug!(index = self.current_index, "playback finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Process, ProcessId};
    use crate::scheduler::compute_timeline;

    fn sample_segments() -> Vec<Segment> {
        let processes = vec![
            Process::new(ProcessId(0), "P1", 4),
            Process::new(ProcessId(1), "P2", 6),
            Process::new(ProcessId(2), "P3", 2),
        ];
        compute_timeline(&processes, 3).segments().to_vec()
    }

    #[test]
    fn test_initial_state() {
        let player = Player::new(&Config::default());
        assert_eq!(player.state(), PlaybackState::Idle);
        assert_eq!(player.current_index(), 0);
        assert!(!player.is_playing());
        assert!((player.speed_factor() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_play_empty_is_noop() {
        let mut player = Player::new(&Config::default());
        let status = player.play(0.0, 0);
        assert_eq!(status.state, PlaybackState::Idle);
        assert!(!status.playing);
        assert_eq!(player.tick(100.0, &[]), TickOutcome::Inactive);
    }

    #[test]
    fn test_tick_advances_after_display_duration() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        player.play(0.0, segs.len());

        // First segment: 3 units * 300ms
        assert_eq!(player.tick(899.0, &segs), TickOutcome::Waiting);
        assert_eq!(player.tick(900.0, &segs), TickOutcome::Advanced(0));
        assert_eq!(player.current_index(), 1);

        // Timer restarts at the advancing tick
        assert_eq!(player.tick(1700.0, &segs), TickOutcome::Waiting);
        assert_eq!(player.tick(1800.0, &segs), TickOutcome::Advanced(1));
    }

    #[test]
    fn test_one_segment_per_tick() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        player.play(0.0, segs.len());
        assert_eq!(player.tick(1_000_000.0, &segs), TickOutcome::Advanced(0));
        assert_eq!(player.current_index(), 1);
    }

    #[test]
    fn test_runs_to_finished() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        player.play(0.0, segs.len());

        let mut now = 0.0;
        let mut last = TickOutcome::Inactive;
        while player.is_playing() {
            now += 16.0;
            last = player.tick(now, &segs);
        }

        assert_eq!(last, TickOutcome::Finished(segs.len() - 1));
        assert_eq!(player.state(), PlaybackState::Finished);
        assert_eq!(player.current_index(), segs.len() - 1);
        assert_eq!(player.tick(now + 10_000.0, &segs), TickOutcome::Inactive);
        assert!((player.progress(now, &segs) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pause_restarts_segment_timer() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        player.play(0.0, segs.len());
        assert_eq!(player.tick(800.0, &segs), TickOutcome::Waiting);

        let status = player.pause();
        assert_eq!(status.state, PlaybackState::Paused);
        assert_eq!(status.current_index, 0);
        assert_eq!(player.tick(5000.0, &segs), TickOutcome::Inactive);

        // Resume at t=1000: a full 900ms is needed again
        player.play(1000.0, segs.len());
        assert_eq!(player.tick(1100.0, &segs), TickOutcome::Waiting);
        assert_eq!(player.tick(1899.0, &segs), TickOutcome::Waiting);
        assert_eq!(player.tick(1900.0, &segs), TickOutcome::Advanced(0));
    }

    #[test]
    fn test_speed_change_mid_segment() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        player.play(0.0, segs.len());
        assert_eq!(player.tick(400.0, &segs), TickOutcome::Waiting);

        // At 2x the first segment needs 450ms; 400ms already elapsed
        player.set_speed_factor(2.0);
        assert_eq!(player.tick(449.0, &segs), TickOutcome::Waiting);
        assert_eq!(player.tick(450.0, &segs), TickOutcome::Advanced(0));
    }

    #[test]
    fn test_speed_factor_bounds() {
        let mut player = Player::new(&Config::default());
        assert!((player.set_speed_factor(10.0) - 4.0).abs() < 1e-10);
        assert!((player.set_speed_factor(0.01) - 0.25).abs() < 1e-10);
        assert!((player.set_speed_factor(-1.0) - 0.25).abs() < 1e-10);
        assert!((player.set_speed_factor(f64::NAN) - 0.25).abs() < 1e-10);
        assert!((player.set_speed_factor(1.5) - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_step_clamps_and_pauses() {
        let mut player = Player::new(&Config::default());
        let status = player.step_back(5);
        assert_eq!(status.current_index, 0);
        assert_eq!(status.state, PlaybackState::Paused);

        for _ in 0..10 {
            player.step_forward(5);
        }
        assert_eq!(player.current_index(), 4);

        player.step_back(5);
        assert_eq!(player.current_index(), 3);

        // Empty trace: cursor untouched
        player.reset();
        assert_eq!(player.step_forward(0).state, PlaybackState::Idle);
    }

    #[test]
    fn test_step_ignored_while_playing() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        player.play(0.0, segs.len());
        let status = player.step_forward(segs.len());
        assert_eq!(status.current_index, 0);
        assert!(status.playing);
    }

    #[test]
    fn test_play_from_finished_rewinds() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        for _ in 0..segs.len() {
            player.step_forward(segs.len());
        }
        player.play(0.0, segs.len());
        let mut now = 0.0;
        while player.is_playing() {
            now += 100.0;
            player.tick(now, &segs);
        }
        assert_eq!(player.state(), PlaybackState::Finished);

        let status = player.play(now, segs.len());
        assert_eq!(status.current_index, 0);
        assert_eq!(status.state, PlaybackState::Playing);
    }

    #[test]
    fn test_reset() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        player.play(0.0, segs.len());
        player.tick(900.0, &segs);
        let status = player.reset();
        assert_eq!(status.current_index, 0);
        assert_eq!(status.state, PlaybackState::Idle);
        assert!(!status.playing);
    }

    #[test]
    fn test_progress() {
        let segs = sample_segments();
        let mut player = Player::new(&Config::default());
        assert!((player.progress(0.0, &segs) - 0.0).abs() < 1e-10);
        player.play(100.0, segs.len());
        assert!((player.progress(550.0, &segs) - 0.5).abs() < 1e-10);
        assert!((player.progress(5000.0, &segs) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_unusable_timing_config_falls_back() {
        let segs = sample_segments();
        for base in [f64::NAN, 0.0, -5.0, f64::INFINITY] {
            let mut player = Player::new(&Config::default().with_base_unit_ms(base));
            assert!((player.display_duration_ms(&segs[0]) - 900.0).abs() < 1e-10);
            player.play(0.0, segs.len());
            assert_eq!(player.tick(0.0, &segs), TickOutcome::Waiting);
            assert_eq!(player.tick(899.0, &segs), TickOutcome::Waiting);
            assert_eq!(player.tick(900.0, &segs), TickOutcome::Advanced(0));
        }

        let mut player = Player::new(&Config::default().with_speed_range(-1.0, -2.0));
        assert!((player.speed_factor() - 1.0).abs() < 1e-10);
        assert!((player.set_speed_factor(10.0) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_tick_outcome_completed() {
        assert_eq!(TickOutcome::Advanced(2).completed(), Some(2));
        assert_eq!(TickOutcome::Finished(4).completed(), Some(4));
        assert_eq!(TickOutcome::Waiting.completed(), None);
    }
}
