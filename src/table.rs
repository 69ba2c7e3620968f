//! A passive, fixed-capacity array of [`Slot`] cells.
//!
//! Carries no synchronization of its own — that is [`crate::engine::Engine`]'s
//! responsibility.

use crate::bucket::Slot;
use crate::error::{Error, Result};

pub(crate) struct BucketTable {
    slots: Vec<Slot>,
}

impl BucketTable {
    /// Allocates a table of exactly `capacity` empty slots. Fails with
    /// `OutOfMemory` rather than aborting the process if the allocator
    /// cannot satisfy the request.
    pub(crate) fn new(capacity: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity).map_err(|_| Error::OutOfMemory)?;
        slots.resize_with(capacity, Slot::default);
        Ok(Self { slots })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Slot {
        &mut self.slots[index]
    }

    /// Cyclic successor of `index` within this table's capacity.
    #[inline]
    pub(crate) fn next(&self, index: usize) -> usize {
        let cap = self.capacity();
        if index + 1 == cap {
            0
        } else {
            index + 1
        }
    }

    pub(crate) fn iter_occupied(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key.as_ref(), value.as_ref())),
            _ => None,
        })
    }
}
