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

//! Visibility contract consumed from the transaction manager
//!
//! The storage core never interprets MVCC fields itself; the optimizer
//! sampler asks the table's visibility checker whether a slot should be
//! considered. A full transaction manager plugs in here.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::storage::tile_group_header::TileGroupHeader;

static NEXT_TS: AtomicU64 = AtomicU64::new(1);

/// Vend a process-wide monotone insertion timestamp. Never returns zero,
/// so a stamped slot is distinguishable from an empty one.
pub(crate) fn insertion_timestamp() -> u64 {
    NEXT_TS.fetch_add(1, Ordering::Relaxed)
}

/// Visibility predicate on a slot header, implemented by the transaction
/// manager
pub trait VisibilityChecker: Send + Sync {
    /// Whether the version in `slot` is visible to the calling context
    fn is_visible(&self, header: &TileGroupHeader, slot: usize) -> bool;
}

/// Default checker: a slot is visible once its begin timestamp has been
/// stamped and no end timestamp has been set. Suitable for single-version
/// workloads and tests; a real MVCC protocol replaces it.
#[derive(Debug, Default)]
pub struct CommittedVisibility;

impl VisibilityChecker for CommittedVisibility {
    fn is_visible(&self, header: &TileGroupHeader, slot: usize) -> bool {
        slot < header.next_tuple_slot() && header.begin_ts(slot) != 0 && header.end_ts(slot) == 0
    }
}
