//! Engine and playback configuration.
//!
//! All fields have defaults, so a partial JSON document (or none at all)
//! yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Wall-clock milliseconds per engine time unit at speed factor 1.
pub const DEFAULT_BASE_UNIT_MS: f64 = 300.0;

/// Colours handed out to new processes by creation index.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#60a5fa", "#f472b6", "#f59e0b", "#34d399", "#a78bfa", "#fb7185",
];

/// Configuration for a scheduling [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wall-clock ms per engine time unit at speed factor 1.
    pub base_unit_ms: f64,
    /// Quantum used until the caller sets one.
    pub default_quantum: u32,
    /// Lower bound for the playback speed multiplier.
    pub min_speed_factor: f64,
    /// Upper bound for the playback speed multiplier.
    pub max_speed_factor: f64,
    /// Number of processes produced by a randomised batch.
    pub random_batch_size: usize,
    /// Smallest burst a randomised batch may draw.
    pub random_burst_min: u32,
    /// Largest burst a randomised batch may draw.
    pub random_burst_max: u32,
    /// Display colours, assigned by index modulo length.
    pub palette: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_unit_ms: DEFAULT_BASE_UNIT_MS,
            default_quantum: 2,
            min_speed_factor: 0.25,
            max_speed_factor: 4.0,
            random_batch_size: 4,
            random_burst_min: 1,
            random_burst_max: 10,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Config {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the wall-clock duration of one engine time unit.
    pub fn with_base_unit_ms(mut self, ms: f64) -> Self {
        self.base_unit_ms = ms;
        self
    }

    /// Sets the initial quantum.
    pub fn with_default_quantum(mut self, quantum: u32) -> Self {
        self.default_quantum = quantum;
        self
    }

    /// Sets the allowed speed factor range.
    pub fn with_speed_range(mut self, min: f64, max: f64) -> Self {
        self.min_speed_factor = min;
        self.max_speed_factor = max;
        self
    }

    /// Sets the randomised batch size and burst range.
    pub fn with_random_batch(mut self, size: usize, burst_min: u32, burst_max: u32) -> Self {
        self.random_batch_size = size;
        self.random_burst_min = burst_min;
        self.random_burst_max = burst_max;
        self
    }

    /// Replaces the colour palette.
    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        self.palette = palette;
        self
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        if !self.base_unit_ms.is_finite() || self.base_unit_ms <= 0.0 {
            return Err(Error::Config(format!(
                "base_unit_ms must be positive, got {}",
                self.base_unit_ms
            )));
        }
        if self.default_quantum == 0 {
            return Err(Error::Config("default_quantum must be at least 1".into()));
        }
        if self.min_speed_factor.is_nan()
            || self.min_speed_factor <= 0.0
            || !self.max_speed_factor.is_finite()
        {
            return Err(Error::Config(format!(
                "speed range must be positive and finite, got {}..{}",
                self.min_speed_factor, self.max_speed_factor
            )));
        }
        if self.min_speed_factor > self.max_speed_factor {
            return Err(Error::Config(format!(
                "min_speed_factor {} exceeds max_speed_factor {}",
                self.min_speed_factor, self.max_speed_factor
            )));
        }
        if self.random_burst_min == 0 || self.random_burst_min > self.random_burst_max {
            return Err(Error::Config(format!(
                "random burst range {}..={} is invalid",
                self.random_burst_min, self.random_burst_max
            )));
        }
        if self.palette.is_empty() {
            return Err(Error::Config("palette must not be empty".into()));
        }
        Ok(())
    }

    /// Colour for the process created at `index`.
    pub fn color_for(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
        }
        &self.palette[index % self.palette.len()]
    }
}
