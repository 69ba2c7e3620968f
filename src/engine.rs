//! The engine owns the current table, item count, memory accounting, and
//! the synchronization discipline under which put/get/delete/stats and
//! resize all run.

use parking_lot::Mutex;

use crate::bucket::new_occupied;
use crate::config::{clamp_capacity, MAX_CAPACITY, MAX_LOAD_FACTOR, MIN_CAPACITY, MIN_LOAD_FACTOR};
use crate::error::{Error, Result};
use crate::keys;
use crate::resize;
use crate::siphash::siphash24;
use crate::table::BucketTable;

/// Read-only snapshot of the engine's counters. See [`Engine::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub item_count: usize,
    pub capacity: usize,
    /// Approximates `Σ(key_len + value_len)` over occupied buckets.
    pub memory_bytes: usize,
}

struct Inner {
    table: BucketTable,
    item_count: usize,
    memory_bytes: usize,
}

/// An in-process key/value storage engine on an open-addressed,
/// linearly-probed hash table with SipHash-2-4 indexing.
///
/// All operations serialize through a single engine-wide mutex. Finer
/// grained designs (per-bucket locks, sharding) are possible but this one
/// is trivially correct, and resize needs a whole-table view regardless.
pub struct Engine {
    inner: Mutex<Inner>,
    k0: u64,
    k1: u64,
}

fn validate_bytes(bytes: &[u8], what: &'static str) -> Result<()> {
    if bytes.is_empty() {
        Err(Error::InvalidArgument(what))
    } else {
        Ok(())
    }
}

impl Engine {
    /// Creates an engine with the given initial capacity (clamped into
    /// `[MIN_CAPACITY, MAX_CAPACITY]`), drawing fresh hash keys from a
    /// cryptographically strong source (falling back to a logged-weak
    /// source if unavailable).
    ///
    /// `capacity == 0` is rejected as `InvalidArgument`; any other value is
    /// silently clamped into range.
    pub fn init(capacity: usize) -> Result<Engine> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be positive"));
        }
        let capacity = clamp_capacity(capacity);
        let table = BucketTable::new(capacity)?;
        let (k0, k1) = keys::generate();
        Ok(Engine {
            inner: Mutex::new(Inner {
                table,
                item_count: 0,
                memory_bytes: 0,
            }),
            k0,
            k1,
        })
    }

    #[inline]
    fn hash(&self, key: &[u8]) -> u64 {
        siphash24(key, self.k0, self.k1)
    }

    /// Inserts `key` → `value`, or overwrites the value if `key` is already
    /// present. `item_count` is unchanged on overwrite.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        validate_bytes(key, "key must not be empty")?;
        validate_bytes(value, "value must not be empty")?;

        let mut inner = self.inner.lock();
        loop {
            let capacity = inner.table.capacity();
            let projected_load = (inner.item_count + 1) as f64 / capacity as f64;
            if projected_load > MAX_LOAD_FACTOR && capacity < MAX_CAPACITY {
                self.grow(&mut inner, capacity.saturating_mul(2))?;
                continue;
            }

            let start = (self.hash(key) as usize) % capacity;
            let mut index = start;
            let mut reuse: Option<usize> = None;
            let mut saturated = true;

            for _ in 0..capacity {
                let slot = inner.table.get(index);
                if slot.is_empty() {
                    let target = reuse.unwrap_or(index);
                    let bytes = key.len() + value.len();
                    *inner.table.get_mut(target) = new_occupied(key, value);
                    inner.item_count += 1;
                    inner.memory_bytes += bytes;
                    saturated = false;
                    break;
                } else if slot.is_tombstone() {
                    if reuse.is_none() {
                        reuse = Some(index);
                    }
                } else if slot.matches(key) {
                    let old_len = slot.value().map(|v| v.len()).unwrap_or(0);
                    *inner.table.get_mut(index) = new_occupied(key, value);
                    inner.memory_bytes =
                        (inner.memory_bytes + value.len()).saturating_sub(old_len);
                    saturated = false;
                    break;
                }
                index = inner.table.next(index);
            }

            if saturated {
                if capacity == MAX_CAPACITY {
                    return Err(Error::NoSpace);
                }
                self.grow(&mut inner, capacity.saturating_mul(2))?;
                continue;
            }
            return Ok(());
        }
    }

    /// Returns a copy of the value stored for `key`, or `NotFound`.
    ///
    /// Returns an owned buffer rather than a borrow into the table: the
    /// engine deep-copies on `put`, so there is nothing unsound about a
    /// borrow, but a copy keeps the contract simple across a concurrent
    /// resize and matches every other operation's atomic-at-the-boundary
    /// semantics.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        validate_bytes(key, "key must not be empty")?;
        let inner = self.inner.lock();
        let capacity = inner.table.capacity();
        let start = (self.hash(key) as usize) % capacity;
        let mut index = start;
        for _ in 0..capacity {
            let slot = inner.table.get(index);
            if slot.is_empty() {
                return Err(Error::NotFound);
            }
            if slot.matches(key) {
                return Ok(slot.value().unwrap().to_vec());
            }
            index = inner.table.next(index);
        }
        Err(Error::NotFound)
    }

    /// Deletes `key`, converting its bucket to a tombstone. Returns
    /// `NotFound` if the key is absent. May trigger a best-effort shrink
    /// (a failed shrink allocation is silently ignored; the table remains
    /// valid at its current capacity).
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        validate_bytes(key, "key must not be empty")?;
        let mut inner = self.inner.lock();
        let capacity = inner.table.capacity();
        let start = (self.hash(key) as usize) % capacity;
        let mut index = start;
        let mut found = false;

        for _ in 0..capacity {
            let slot = inner.table.get(index);
            if slot.is_empty() {
                break;
            }
            if slot.matches(key) {
                let (k, v) = inner.table.get_mut(index).make_tombstone();
                inner.item_count -= 1;
                inner.memory_bytes = inner.memory_bytes.saturating_sub(k.len() + v.len());
                found = true;
                break;
            }
            index = inner.table.next(index);
        }

        if !found {
            return Err(Error::NotFound);
        }

        let load = inner.item_count as f64 / inner.table.capacity() as f64;
        if inner.table.capacity() > MIN_CAPACITY && load < MIN_LOAD_FACTOR {
            let target = (inner.table.capacity() / 2).max(MIN_CAPACITY);
            // best-effort: a shrink failure leaves the table at its
            // current (still perfectly valid) capacity.
            let _ = self.grow(&mut inner, target);
        }

        Ok(())
    }

    /// Reads a consistent snapshot of the engine's counters.
    pub fn stats(&self) -> Stats {
        let inner = self.inner.lock();
        Stats {
            item_count: inner.item_count,
            capacity: inner.table.capacity(),
            memory_bytes: inner.memory_bytes,
        }
    }

    /// Resizes to exactly `target` buckets (growing or shrinking), holding
    /// the engine lock across the entire operation so no reader or writer
    /// ever observes a partially-rehashed table. `target` is clamped into
    /// range by the resize controller; tombstones are discarded in the
    /// process.
    fn grow(&self, inner: &mut Inner, target: usize) -> Result<()> {
        let new_table = resize::rehash(&inner.table, target, self.k0, self.k1)?;
        inner.table = new_table;
        Ok(())
    }
}
