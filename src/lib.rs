//! Parallel min/max/mean aggregation over `key;value` measurement files.
//!
//! The input is memory-mapped by the caller and handed to [`aggregate`] as a
//! byte slice. Workers claim byte ranges, scan them into private
//! [`PartitionTable`]s, and the tables are merged into one [`FinalResult`].
//!
//! ```no_run
//! use one_brc::{aggregate, EngineConfig};
//!
//! let data = b"Hamburg;12.0\nBulawayo;8.9\nHamburg;-3.4\n";
//! let agg = aggregate(data, &EngineConfig::default())?;
//! assert_eq!(agg.result.get(b"Hamburg").unwrap().count, 2);
//! # Ok::<(), one_brc::EngineError>(())
//! ```

pub mod config;
pub mod distribute;
pub mod error;
pub mod hash;
pub mod merge;
pub mod parse;
pub mod report;
pub mod scan;
pub mod stats;
pub mod table;
pub mod verify;

pub use config::{EngineConfig, Partitioning};
pub use distribute::{aggregate, Aggregation, ByteRange};
pub use error::{EngineError, ScanError};
pub use merge::{merge, FinalResult, RunSummary, WorkerSummary};
pub use stats::Stats;
pub use table::{PartitionTable, TableError};
