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

//! Process-wide catalog manager
//!
//! The catalog maps tile group ids to shared tile group handles and vends
//! monotonically increasing object ids. Tables never hand out raw
//! references to their tile groups; every access goes through a catalog
//! lookup, which is what lets [`DataTable::transform_tile_group`] publish
//! a re-laid-out tile group atomically by replacing the registry entry.
//!
//! [`DataTable::transform_tile_group`]: crate::storage::DataTable::transform_tile_group

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::core::Oid;
use crate::storage::tile_group::TileGroup;

/// Registry of live tile groups, shared between tables via `Arc`.
///
/// All operations are internally thread-safe.
#[derive(Debug)]
pub struct Catalog {
    next_oid: AtomicU64,
    tile_groups: DashMap<Oid, Arc<TileGroup>>,
}

impl Catalog {
    /// Create an empty catalog. Oid 0 is never vended so it can serve as
    /// an "unset" marker in serialized forms.
    pub fn new() -> Self {
        Self {
            next_oid: AtomicU64::new(1),
            tile_groups: DashMap::new(),
        }
    }

    /// Vend the next object id. Ids are unique and monotonically
    /// increasing for the lifetime of the catalog.
    pub fn next_oid(&self) -> Oid {
        self.next_oid.fetch_add(1, Ordering::Relaxed)
    }

    /// Register a tile group under the given id, replacing any existing
    /// entry. Replacement is the publication point for tile group
    /// transformation: readers holding the old handle keep a consistent
    /// snapshot, new readers observe the replacement.
    pub fn add_tile_group(&self, tile_group_id: Oid, tile_group: Arc<TileGroup>) {
        self.tile_groups.insert(tile_group_id, tile_group);
    }

    /// Drop the registry entry for the given id. The tile group itself is
    /// freed once the last outstanding handle goes away.
    pub fn drop_tile_group(&self, tile_group_id: Oid) {
        self.tile_groups.remove(&tile_group_id);
    }

    /// Look up a tile group by id
    pub fn get_tile_group(&self, tile_group_id: Oid) -> Option<Arc<TileGroup>> {
        self.tile_groups.get(&tile_group_id).map(|g| Arc::clone(&g))
    }

    /// Number of registered tile groups
    pub fn tile_group_count(&self) -> usize {
        self.tile_groups.len()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oid_monotonic() {
        let catalog = Catalog::new();
        let a = catalog.next_oid();
        let b = catalog.next_oid();
        assert!(b > a);
        assert!(a > 0);
    }
}
