use ahash::AHashMap;
use log::debug;

use crate::stats::Stats;
use crate::table::PartitionTable;

/// Diagnostics one worker hands back with its table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub chunks: u64,
    pub lines: u64,
    pub max_probe: usize,
    pub collided: usize,
}

/// Worker diagnostics folded across the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub workers: usize,
    pub chunks: u64,
    pub lines: u64,
    pub max_probe: usize,
    pub collided: usize,
}

impl RunSummary {
    pub fn absorb(&mut self, w: &WorkerSummary) {
        self.workers += 1;
        self.chunks += w.chunks;
        self.lines += w.lines;
        self.max_probe = self.max_probe.max(w.max_probe);
        self.collided += w.collided;
    }
}

/// Merged per-key statistics for the whole input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalResult {
    stations: AHashMap<Box<[u8]>, Stats>,
}

impl FinalResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &[u8]) -> Option<&Stats> {
        self.stations.get(key)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Total observations across all keys.
    pub fn total_count(&self) -> u64 {
        self.stations.values().map(|s| s.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Stats)> {
        self.stations.iter().map(|(k, s)| (&k[..], s))
    }

    /// Entries ordered by raw key bytes.
    pub fn sorted(&self) -> Vec<(&[u8], &Stats)> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_unstable_by(|a, b| a.0.cmp(b.0));
        v
    }

    /// Folds `stats` into the entry for `key`, creating it on first sight.
    pub fn merge_entry(&mut self, key: &[u8], stats: &Stats) {
        if stats.is_empty() {
            return;
        }
        match self.stations.get_mut(key) {
            Some(existing) => existing.merge(stats),
            None => {
                self.stations.insert(key.into(), *stats);
            }
        }
    }

    pub fn merge_table(&mut self, tbl: &PartitionTable) {
        debug!("accumulating {} keys", tbl.len());
        for (key, stats) in tbl.iter() {
            self.merge_entry(key, stats);
        }
    }
}

/// Folds worker tables and their diagnostics into one result.
#[derive(Debug, Default)]
pub struct Merger {
    result: FinalResult,
    summary: RunSummary,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, tbl: PartitionTable, summary: WorkerSummary) {
        self.result.merge_table(&tbl);
        self.summary.absorb(&summary);
    }

    pub fn finish(self) -> (FinalResult, RunSummary) {
        (self.result, self.summary)
    }
}

/// Merges `tables` into a single result.
pub fn merge<I>(tables: I) -> FinalResult
where
    I: IntoIterator<Item = PartitionTable>,
{
    let mut result = FinalResult::new();
    for tbl in tables {
        result.merge_table(&tbl);
    }
    result
}
