//! Grows or shrinks the table, rehashing live entries and discarding
//! tombstones.

use crate::config::{clamp_capacity, MAX_CAPACITY};
use crate::error::{Error, Result};
use crate::table::BucketTable;

enum Outcome {
    Done(BucketTable),
    Saturated,
}

/// Rehashes every occupied bucket of `old` into a fresh table of capacity
/// `target`, growing further (clamped at [`MAX_CAPACITY`]) if pathological
/// clustering prevents every entry from finding a slot.
///
/// Tombstones are discarded, so the table that comes out of a successful
/// resize never carries one over from the old table.
pub(crate) fn rehash(old: &BucketTable, target: usize, k0: u64, k1: u64) -> Result<BucketTable> {
    let mut target = clamp_capacity(target);
    loop {
        match try_rehash_into(old, target, k0, k1)? {
            Outcome::Done(table) => return Ok(table),
            Outcome::Saturated => {
                if target == MAX_CAPACITY {
                    return Err(Error::NoSpace);
                }
                target = clamp_capacity(target.saturating_mul(2));
            }
        }
    }
}

/// Attempts a single rehash pass into a table of exactly `target` buckets.
/// Reports `Outcome::Saturated` if some entry's probe chain exhausts
/// `target` steps without finding an empty bucket (realistically
/// unreachable with SipHash and a load factor under 1.0, but the resize
/// controller stays defensive). Allocation failure for the new table
/// itself is a hard `OutOfMemory`, not treated as saturation.
fn try_rehash_into(old: &BucketTable, target: usize, k0: u64, k1: u64) -> Result<Outcome> {
    let mut new_table = BucketTable::new(target)?;
    for (key, value) in old.iter_occupied() {
        let start = (crate::siphash::siphash24(key, k0, k1) as usize) % target;
        let mut index = start;
        let mut placed = false;
        for _ in 0..target {
            if new_table.get(index).is_empty() {
                *new_table.get_mut(index) = crate::bucket::new_occupied(key, value);
                placed = true;
                break;
            }
            index = new_table.next(index);
        }
        if !placed {
            return Ok(Outcome::Saturated);
        }
    }
    Ok(Outcome::Done(new_table))
}
