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

//! Storage layer: hybrid row/column table storage
//!
//! The physical model is a two-level partitioning. A table is an ordered
//! list of tile groups, each a horizontal slab of `N` tuple slots; inside
//! a tile group, a column map assigns every logical column to a position
//! in one of its tiles. Re-partitioning a tile group to match the
//! observed workload changes physical placement only, logical column
//! identity is preserved.
//!
//! - [`catalog`] - tile group registry and oid authority
//! - [`tile`] - column-slab backing store
//! - [`tile_group`] - horizontal partition plus column map
//! - [`tile_group_header`] - per-slot MVCC metadata, slot allocator
//! - [`data_table`] - the logical table and its insertion path
//! - [`layout`] - layout policy and static column maps
//! - [`clusterer`] - workload-driven column co-location
//! - [`sampling`] - optimizer row sampling and cardinality
//! - [`index`] - index contract and a hash index
//! - [`visibility`] - visibility contract for the sampler

pub mod catalog;
pub mod clusterer;
pub mod data_table;
pub mod index;
pub mod layout;
pub mod sampling;
pub mod tile;
pub mod tile_group;
pub mod tile_group_header;
pub mod visibility;

pub use catalog::Catalog;
pub use clusterer::{Clusterer, Sample};
pub use data_table::{DataTable, ForeignKey};
pub use index::{HashIndex, Index};
pub use layout::{column_layout, row_layout, TableLayoutPolicy};
pub use tile::Tile;
pub use tile_group::{validate_column_map, ColumnMap, TileGroup};
pub use tile_group_header::TileGroupHeader;
pub use visibility::{CommittedVisibility, VisibilityChecker};
