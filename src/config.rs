use std::thread;

use crate::error::{EngineError, Result};
use crate::table::DEFAULT_CAPACITY;

/// Chunk size claimed per step when partitioning dynamically.
pub const DEFAULT_CHUNK_SIZE: u64 = 150_000_000;

/// How the input is split between workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partitioning {
    /// Workers repeatedly claim `chunk_size` bytes from a shared cursor.
    Dynamic { chunk_size: u64 },
    /// One contiguous range per worker, computed up front.
    Static,
}

impl Default for Partitioning {
    fn default() -> Self {
        Partitioning::Dynamic {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Size of the worker pool.
    pub workers: usize,
    /// Slots per partition table; must be a power of two.
    pub capacity: usize,
    pub partitioning: Partitioning,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: available_workers(),
            capacity: DEFAULT_CAPACITY,
            partitioning: Partitioning::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(EngineError::InvalidConfig("workers must be > 0".into()));
        }
        if !self.capacity.is_power_of_two() {
            return Err(EngineError::InvalidConfig(format!(
                "capacity {} is not a power of two",
                self.capacity
            )));
        }
        if let Partitioning::Dynamic { chunk_size: 0 } = self.partitioning {
            return Err(EngineError::InvalidConfig("chunk size must be > 0".into()));
        }
        Ok(())
    }
}

/// Number of processors available to this process, or 1 if unknown.
pub fn available_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.workers >= 1);
        assert_eq!(cfg.capacity, 16384);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            EngineConfig {
                workers: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                capacity: 1000,
                ..EngineConfig::default()
            },
            EngineConfig {
                capacity: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                partitioning: Partitioning::Dynamic { chunk_size: 0 },
                ..EngineConfig::default()
            },
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(EngineError::InvalidConfig(_))),
                "{cfg:?}"
            );
        }
    }
}
