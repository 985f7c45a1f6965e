//! Fixed-capacity open-addressing table keyed by raw station bytes.
//!
//! Each worker owns one [`PartitionTable`]. Slots live in a single flat
//! vector; collisions are resolved by linear probing. The table never grows:
//! running out of slots is reported as [`TableError::Overflow`].

use thiserror::Error;

use crate::hash::hash_key;
use crate::stats::Stats;

/// Longest key a slot can hold.
pub const MAX_KEY_LEN: usize = 100;

/// Slot count used when none is configured.
pub const DEFAULT_CAPACITY: usize = 16384;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("partition table overflowed: all {capacity} slots probed")]
    Overflow { capacity: usize },

    #[error("key of {len} bytes exceeds the {max}-byte limit")]
    KeyTooLong { len: usize, max: usize },

    #[error("empty key")]
    EmptyKey,
}

#[derive(Clone)]
struct Slot {
    hash: i32,
    len: usize,
    collided: bool,
    key: [u8; MAX_KEY_LEN],
    stats: Stats,
}

impl Slot {
    const EMPTY: Slot = Slot {
        hash: 0,
        len: 0,
        collided: false,
        key: [0u8; MAX_KEY_LEN],
        stats: Stats::EMPTY,
    };

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    fn key(&self) -> &[u8] {
        &self.key[..self.len]
    }
}

pub struct PartitionTable {
    slots: Vec<Slot>,
    mask: usize,
    occupied: usize,
    max_probe: usize,
}

impl PartitionTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero or not a power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "capacity must be a power of two"
        );
        Self {
            slots: vec![Slot::EMPTY; capacity],
            mask: capacity - 1,
            occupied: 0,
            max_probe: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Longest probe sequence seen by any lookup so far. A hit on the home
    /// slot counts as one probe.
    pub fn max_probe(&self) -> usize {
        self.max_probe
    }

    /// Number of slots that shared their hash with a different key.
    pub fn collided(&self) -> usize {
        self.slots.iter().filter(|s| s.collided).count()
    }

    /// Returns the record for `key`, inserting an empty one if absent.
    ///
    /// The key is copied into the slot on insertion, so the caller's buffer
    /// need not outlive the table.
    #[inline(always)]
    pub fn find_or_insert(&mut self, key: &[u8]) -> Result<&mut Stats, TableError> {
        if key.is_empty() {
            return Err(TableError::EmptyKey);
        }
        if key.len() > MAX_KEY_LEN {
            return Err(TableError::KeyTooLong {
                len: key.len(),
                max: MAX_KEY_LEN,
            });
        }

        let hash = hash_key(key);
        let mut i = hash as u32 as usize & self.mask;
        let mut probes = 0;

        loop {
            probes += 1;
            if probes > self.slots.len() {
                return Err(TableError::Overflow {
                    capacity: self.slots.len(),
                });
            }

            let slot = &mut self.slots[i];
            if slot.is_empty() {
                slot.hash = hash;
                slot.len = key.len();
                slot.key[..key.len()].copy_from_slice(key);
                slot.stats = Stats::EMPTY;
                self.occupied += 1;
                break;
            }
            if slot.hash == hash {
                if slot.key() == key {
                    break;
                }
                slot.collided = true;
            }
            i = (i + 1) & self.mask;
        }

        self.max_probe = self.max_probe.max(probes);
        Ok(&mut self.slots[i].stats)
    }

    /// Folds one observation into the record for `key`.
    #[inline(always)]
    pub fn accumulate(&mut self, key: &[u8], value: i64) -> Result<(), TableError> {
        self.find_or_insert(key)?.record(value);
        Ok(())
    }

    pub fn get(&self, key: &[u8]) -> Option<&Stats> {
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return None;
        }
        let hash = hash_key(key);
        let mut i = hash as u32 as usize & self.mask;
        for _ in 0..self.slots.len() {
            let slot = &self.slots[i];
            if slot.is_empty() {
                return None;
            }
            if slot.hash == hash && slot.key() == key {
                return Some(&slot.stats);
            }
            i = (i + 1) & self.mask;
        }
        None
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Stats)> {
        self.slots
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| (s.key(), &s.stats))
    }
}

impl Default for PartitionTable {
    fn default() -> Self {
        Self::new()
    }
}
