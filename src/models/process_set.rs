//! Versioned, owned process collection.
//!
//! Every definition change (add, burst edit, remove, clear, batch replace)
//! bumps the version. Consumers cache derived data against the version
//! they computed it from and recompute when it moves.
//!
//! Playback bookkeeping (`consume`, `restore_remaining`) does not bump the
//! version: it changes `remaining`, which no derived trace depends on.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Process, ProcessId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::validation::validate_processes;

/// Bursts of the default seed set.
pub const DEFAULT_SEED_BURSTS: [u32; 4] = [4, 8, 2, 6];

/// An ordered set of processes with stable IDs and a change counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessSet {
    processes: Vec<Process>,
    next_id: u64,
    version: u64,
}

impl ProcessSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from existing processes.
    ///
    /// Fails with every validation problem found (duplicate IDs, zero
    /// bursts, remaining above burst), or with `IdSpaceExhausted` when a
    /// process already holds `u64::MAX` and no further ID could follow it.
    pub fn from_processes(processes: Vec<Process>) -> Result<Self> {
        validate_processes(&processes).map_err(Error::Validation)?;
        let next_id = match processes.iter().map(|p| p.id.0).max() {
            Some(max) => max.checked_add(1).ok_or(Error::IdSpaceExhausted)?,
            None => 0,
        };
        Ok(Self {
            processes,
            next_id,
            version: 0,
        })
    }

    /// Change counter; moves on every definition change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Processes in insertion order.
    pub fn as_slice(&self) -> &[Process] {
        &self.processes
    }

    /// Iterates processes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Process> {
        self.processes.iter()
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Looks up a process by ID.
    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Appends a process.
    ///
    /// A blank name defaults to `P{n+1}`; the colour comes from the
    /// palette by creation index. `burst` must already be coerced to ≥ 1.
    /// Fails with `IdSpaceExhausted` once no fresh ID remains.
    pub fn add(&mut self, name: &str, burst: u32, config: &Config) -> Result<ProcessId> {
        let index = self.processes.len();
        let name = match name.trim() {
            "" => format!("P{}", index + 1),
            trimmed => trimmed.to_string(),
        };
        let id = self.allocate_id()?;
        self.processes
            .push(Process::new(id, name, burst.max(1)).with_color(config.color_for(index)));
        self.touch();
        Ok(id)
    }

    /// Changes a process's burst and resets its remaining time.
    pub fn set_burst(&mut self, id: ProcessId, burst: u32) -> Result<()> {
        let process = self
            .processes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::ProcessNotFound { id })?;
        process.burst = burst.max(1);
        process.restore();
        self.touch();
        Ok(())
    }

    /// Removes a process by ID.
    pub fn remove(&mut self, id: ProcessId) -> Result<Process> {
        let index = self
            .processes
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::ProcessNotFound { id })?;
        let removed = self.processes.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Removes every process.
    pub fn clear(&mut self) {
        self.processes.clear();
        self.touch();
    }

    /// Replaces the set with the default seed (`P1..P4`, bursts 4, 8, 2, 6).
    pub fn seed_default(&mut self, config: &Config) -> Result<()> {
        self.replace_with_bursts(&DEFAULT_SEED_BURSTS, config)
    }

    /// Replaces the set with a randomised batch.
    ///
    /// Draws `config.random_batch_size` bursts uniformly from
    /// `[random_burst_min, random_burst_max]`.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R, config: &Config) -> Result<()> {
        let lo = config.random_burst_min.max(1);
        let hi = config.random_burst_max.max(lo);
        let bursts: Vec<u32> = (0..config.random_batch_size)
            .map(|_| rng.random_range(lo..=hi))
            .collect();
        self.replace_with_bursts(&bursts, config)
    }

    /// Applies a completed segment to a process's remaining time.
    ///
    /// Returns `false` if the process is no longer in the set.
    pub fn consume(&mut self, id: ProcessId, amount: u32) -> bool {
        match self.processes.iter_mut().find(|p| p.id == id) {
            Some(process) => {
                process.consume(amount);
                true
            }
            None => false,
        }
    }

    /// Restores every process's remaining time to its burst.
    pub fn restore_remaining(&mut self) {
        for process in &mut self.processes {
            process.restore();
        }
    }

    /// Whether playback has consumed every process's burst.
    pub fn all_complete(&self) -> bool {
        self.processes.iter().all(Process::is_complete)
    }

    // The whole batch must fit in the ID space before the set is touched.
    fn replace_with_bursts(&mut self, bursts: &[u32], config: &Config) -> Result<()> {
        u64::try_from(bursts.len())
            .ok()
            .and_then(|n| self.next_id.checked_add(n))
            .ok_or(Error::IdSpaceExhausted)?;

        self.processes.clear();
        for (i, &burst) in bursts.iter().enumerate() {
            let id = self.allocate_id()?;
            self.processes.push(
                Process::new(id, format!("P{}", i + 1), burst.max(1))
                    .with_color(config.color_for(i)),
            );
        }
        self.touch();
        Ok(())
    }

    fn allocate_id(&mut self) -> Result<ProcessId> {
        let id = ProcessId(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(Error::IdSpaceExhausted)?;
        Ok(id)
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl<'a> IntoIterator for &'a ProcessSet {
    type Item = &'a Process;
    type IntoIter = std::slice::Iter<'a, Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.processes.iter()
    }
}
