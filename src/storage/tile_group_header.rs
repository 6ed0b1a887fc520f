// Copyright 2026 Tessera Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-slot MVCC metadata and the slot bump allocator
//!
//! Every tile group carries exactly one header. Slot acquisition is a
//! lock-free fetch-add on the bump cursor; the cursor is monotonically
//! non-decreasing and clamped to the slot capacity.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// MVCC fields for one tuple slot.
///
/// The storage core only stamps `begin_ts` on insertion; interpreting the
/// fields is the transaction manager's business.
#[derive(Debug, Default)]
pub struct SlotHeader {
    txn_id: AtomicU64,
    begin_ts: AtomicU64,
    end_ts: AtomicU64,
}

/// Header for one tile group: per-slot MVCC metadata plus the bump
/// cursor yielding the next empty slot.
#[derive(Debug)]
pub struct TileGroupHeader {
    capacity: usize,
    next_slot: AtomicUsize,
    slots: Vec<SlotHeader>,
}

impl TileGroupHeader {
    /// Allocate a header for `capacity` slots, all empty
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| SlotHeader::default()).collect();
        Self {
            capacity,
            next_slot: AtomicUsize::new(0),
            slots,
        }
    }

    /// Number of slots this header covers
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Atomically claim the next empty slot. Returns `None` when the
    /// group is full; the cursor never reads above the capacity.
    pub fn next_empty_slot(&self) -> Option<usize> {
        let slot = self.next_slot.fetch_add(1, Ordering::Relaxed);
        if slot >= self.capacity {
            // losing claimants clamp the cursor back to capacity
            self.next_slot.fetch_min(self.capacity, Ordering::Relaxed);
            return None;
        }
        Some(slot)
    }

    /// The next slot the allocator would hand out, equal to the number of
    /// slots claimed so far
    pub fn next_tuple_slot(&self) -> usize {
        self.next_slot.load(Ordering::Relaxed).min(self.capacity)
    }

    /// Transaction owner of a slot
    pub fn txn_id(&self, slot: usize) -> u64 {
        self.slots[slot].txn_id.load(Ordering::Acquire)
    }

    /// Set the transaction owner of a slot
    pub fn set_txn_id(&self, slot: usize, txn_id: u64) {
        self.slots[slot].txn_id.store(txn_id, Ordering::Release);
    }

    /// Begin timestamp of a slot, zero while the slot is empty
    pub fn begin_ts(&self, slot: usize) -> u64 {
        self.slots[slot].begin_ts.load(Ordering::Acquire)
    }

    /// Stamp the begin timestamp of a slot
    pub fn set_begin_ts(&self, slot: usize, ts: u64) {
        self.slots[slot].begin_ts.store(ts, Ordering::Release);
    }

    /// End timestamp of a slot, zero while the version is live
    pub fn end_ts(&self, slot: usize) -> u64 {
        self.slots[slot].end_ts.load(Ordering::Acquire)
    }

    /// Stamp the end timestamp of a slot
    pub fn set_end_ts(&self, slot: usize, ts: u64) {
        self.slots[slot].end_ts.store(ts, Ordering::Release);
    }

    /// Copy every slot's MVCC fields and the bump cursor from another
    /// header. Used by tile group transformation, which must preserve
    /// visibility exactly.
    pub fn copy_from(&self, other: &TileGroupHeader) {
        assert_eq!(self.capacity, other.capacity, "header capacity mismatch");
        for slot in 0..self.capacity {
            self.slots[slot]
                .txn_id
                .store(other.txn_id(slot), Ordering::Release);
            self.slots[slot]
                .begin_ts
                .store(other.begin_ts(slot), Ordering::Release);
            self.slots[slot]
                .end_ts
                .store(other.end_ts(slot), Ordering::Release);
        }
        self.next_slot
            .store(other.next_tuple_slot(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_allocator_clamps_at_capacity() {
        let header = TileGroupHeader::new(2);
        assert_eq!(header.next_empty_slot(), Some(0));
        assert_eq!(header.next_empty_slot(), Some(1));
        assert_eq!(header.next_empty_slot(), None);
        assert_eq!(header.next_empty_slot(), None);
        assert_eq!(header.next_tuple_slot(), 2);
    }

    #[test]
    fn test_copy_preserves_slots_and_cursor() {
        let src = TileGroupHeader::new(3);
        src.next_empty_slot();
        src.next_empty_slot();
        src.set_begin_ts(0, 7);
        src.set_begin_ts(1, 9);

        let dst = TileGroupHeader::new(3);
        dst.copy_from(&src);
        assert_eq!(dst.next_tuple_slot(), 2);
        assert_eq!(dst.begin_ts(0), 7);
        assert_eq!(dst.begin_ts(1), 9);
        assert_eq!(dst.begin_ts(2), 0);
    }
}
