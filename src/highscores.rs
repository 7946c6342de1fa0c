//! Run history and best distance
//!
//! Stored under the `run_history` save key; keeps the most recent runs.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_RUN_HISTORY: usize = 50;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    /// 1-based run counter (keeps counting after old runs are trimmed)
    pub run: u32,
    /// Distance reached
    pub distance: u64,
    /// Coins earned during the run
    pub coins: u64,
}

/// Finished runs, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunHistory {
    pub entries: Vec<RunEntry>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a run; returns its run number
    pub fn record(&mut self, distance: u64, coins: u64) -> u32 {
        let run = self.entries.last().map_or(1, |e| e.run + 1);
        self.entries.push(RunEntry {
            run,
            distance,
            coins,
        });

        // Drop the oldest runs
        if self.entries.len() > MAX_RUN_HISTORY {
            let excess = self.entries.len() - MAX_RUN_HISTORY;
            self.entries.drain(..excess);
        }
        run
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Longest distance among the kept runs
    pub fn best_distance(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.distance).max()
    }

    pub fn latest(&self) -> Option<&RunEntry> {
        self.entries.last()
    }

    /// Up to `n` most recent runs, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &RunEntry> {
        self.entries.iter().rev().take(n)
    }
}
