//! Splits the mapped input into byte ranges and runs the scan on a fixed
//! pool of workers.
//!
//! Every worker owns one [`PartitionTable`] for its whole lifetime and hands
//! it back over a channel together with its [`WorkerSummary`]. The caller
//! merges the tables once the pool has joined.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{unbounded, Sender};
use log::{debug, info};
use rayon::ThreadPoolBuilder;

use crate::config::{EngineConfig, Partitioning};
use crate::error::{Result, ScanError};
use crate::merge::{FinalResult, Merger, RunSummary, WorkerSummary};
use crate::scan::{scan, starts_at_line_boundary};
use crate::table::PartitionTable;

/// A contiguous slice of file offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub length: u64,
}

impl ByteRange {
    pub fn end(&self) -> u64 {
        self.start + self.length
    }
}

/// Splits `[0, file_size)` into `parts` contiguous ranges. The last range
/// absorbs the remainder.
pub fn static_ranges(file_size: u64, parts: usize) -> Vec<ByteRange> {
    let parts = parts.max(1) as u64;
    let step = file_size / parts;
    (0..parts)
        .map(|i| {
            let start = i * step;
            let end = if i == parts - 1 { file_size } else { start + step };
            ByteRange {
                start,
                length: end - start,
            }
        })
        .collect()
}

/// Shared cursor handing out fixed-size chunks.
pub struct ChunkCursor {
    next: AtomicU64,
    chunk_size: u64,
    file_size: u64,
}

impl ChunkCursor {
    /// `chunk_size` is clamped to the file size so the cursor cannot wrap
    /// around `u64::MAX` after a handful of claims.
    pub fn new(file_size: u64, chunk_size: u64) -> Self {
        Self {
            next: AtomicU64::new(0),
            chunk_size: chunk_size.clamp(1, file_size.max(1)),
            file_size,
        }
    }

    /// Claims the next chunk, or `None` once the cursor has passed the end.
    pub fn claim(&self) -> Option<ByteRange> {
        let start = self.next.fetch_add(self.chunk_size, Ordering::Relaxed);
        if start >= self.file_size {
            return None;
        }
        Some(ByteRange {
            start,
            length: self.chunk_size.min(self.file_size - start),
        })
    }
}

/// Aggregated statistics plus run diagnostics.
#[derive(Debug)]
pub struct Aggregation {
    pub result: FinalResult,
    pub summary: RunSummary,
}

type WorkerOutput = std::result::Result<(PartitionTable, WorkerSummary), ScanError>;

/// Aggregates every line of `data` using the pool described by `config`.
pub fn aggregate(data: &[u8], config: &EngineConfig) -> Result<Aggregation> {
    config.validate()?;

    let file_size = data.len() as u64;
    let workers = config.workers;
    info!(
        "file size {} bytes, {} workers, {:?}",
        file_size, workers, config.partitioning
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("onebrc-worker-{i}"))
        .build()?;

    let (tx, rx) = unbounded::<WorkerOutput>();
    let halt = AtomicBool::new(false);

    match config.partitioning {
        Partitioning::Dynamic { chunk_size } => {
            let cursor = ChunkCursor::new(file_size, chunk_size);
            pool.scope(|s| {
                for _ in 0..workers {
                    let (tx, cursor, halt) = (tx.clone(), &cursor, &halt);
                    s.spawn(move |_| {
                        run_worker(data, config.capacity, || cursor.claim(), halt, &tx)
                    });
                }
            });
        }
        Partitioning::Static => {
            let ranges = static_ranges(file_size, workers);
            pool.scope(|s| {
                for range in ranges {
                    let (tx, halt) = (tx.clone(), &halt);
                    s.spawn(move |_| {
                        let mut once = Some(range);
                        run_worker(data, config.capacity, || once.take(), halt, &tx)
                    });
                }
            });
        }
    }
    drop(tx);

    let mut merger = Merger::new();
    let mut failure = None;
    for output in rx {
        match output {
            Ok((tbl, summary)) => merger.absorb(tbl, summary),
            Err(e) => {
                // report the earliest failing line
                if failure.as_ref().map_or(true, |f: &ScanError| e.offset() < f.offset()) {
                    failure = Some(e);
                }
            }
        }
    }
    if let Some(e) = failure {
        return Err(e.into());
    }

    let (result, summary) = merger.finish();
    info!(
        "{} lines, {} keys, max probe {}",
        summary.lines,
        result.len(),
        summary.max_probe
    );
    Ok(Aggregation { result, summary })
}

fn run_worker<F>(
    data: &[u8],
    capacity: usize,
    mut next_range: F,
    halt: &AtomicBool,
    tx: &Sender<WorkerOutput>,
) where
    F: FnMut() -> Option<ByteRange>,
{
    let mut tbl = PartitionTable::with_capacity(capacity);
    let mut summary = WorkerSummary::default();

    while !halt.load(Ordering::Relaxed) {
        let Some(range) = next_range() else { break };
        debug!("parsing chunk at {} of size {}", range.start, range.length);

        let start = range.start as usize;
        let at_line_start = starts_at_line_boundary(data, start);
        match scan(&data[start..], range.length as usize, &mut tbl, at_line_start) {
            Ok(lines) => {
                summary.chunks += 1;
                summary.lines += lines;
            }
            Err(e) => {
                halt.store(true, Ordering::Relaxed);
                let _ = tx.send(Err(e.rebase(range.start)));
                return;
            }
        }
    }

    summary.max_probe = tbl.max_probe();
    summary.collided = tbl.collided();
    let _ = tx.send(Ok((tbl, summary)));
}
