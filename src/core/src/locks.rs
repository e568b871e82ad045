//! Striped per-key locks.
//!
//! Every operation locks the stripes of all keys it touches before reading
//! them, and holds them until its write set is committed. Stripes are always
//! taken in ascending index order, so two operations with overlapping keys can
//! never deadlock; operations on disjoint stripes run in parallel.

use crate::state::StateKey;
use byteorder::{ByteOrder, LittleEndian};
use std::sync::{Mutex, MutexGuard};

/// Default number of stripes.
pub const DEFAULT_STRIPES: usize = 64;

/// A fixed table of mutexes indexed by key hash.
pub struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

/// Holds the stripes of one operation; they are released on drop.
pub struct KeyGuard<'a> {
    _guards: Vec<MutexGuard<'a, ()>>,
}

impl KeyLocks {
    /// Creates a table with `count` stripes (at least one).
    pub fn new(count: usize) -> Self {
        let count = count.max(1);
        Self {
            stripes: (0..count).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Number of stripes in the table, never zero.
    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    /// Returns the stripe a key maps to.
    pub fn stripe_of(&self, key: &StateKey) -> usize {
        // Keys are hash outputs or random identities already, so their leading
        // bytes are well distributed.
        let (tag, bytes) = match key {
            StateKey::Mint(token) => (0x6d69_6e74u64, token.as_bytes()),
            StateKey::Account(address) => (0x6163_6374u64, address.as_bytes()),
        };
        let word = LittleEndian::read_u64(&bytes[..8]) ^ tag;
        (word % self.stripes.len() as u64) as usize
    }

    /// Locks every stripe covering `keys`.
    pub fn acquire(&self, keys: &[StateKey]) -> KeyGuard<'_> {
        let mut indices: Vec<usize> = keys.iter().map(|key| self.stripe_of(key)).collect();
        indices.sort_unstable();
        indices.dedup();

        let guards = indices
            .into_iter()
            // The mutexes guard no data, so a poisoned stripe is still usable.
            .map(|i| self.stripes[i].lock().unwrap_or_else(|e| e.into_inner()))
            .collect();

        KeyGuard { _guards: guards }
    }
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
