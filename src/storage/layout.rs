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

//! Table layout policy
//!
//! Everything that used to be tuned per process lives here and is passed
//! at table construction: the layout mode for freshly allocated tile
//! groups, the clustering knobs and the sampling retry bound.

use crate::core::LayoutType;
use crate::storage::tile_group::ColumnMap;

/// Per-table layout and adaptivity configuration
#[derive(Debug, Clone)]
pub struct TableLayoutPolicy {
    /// Layout for freshly allocated tile groups
    pub layout: LayoutType,

    /// Whether the table participates in adaptive re-layout. Non-adaptive
    /// tables always get row layout regardless of `layout`.
    pub adapt: bool,

    /// Hybrid layout falls back to row when the table has fewer columns
    /// than this
    pub hybrid_row_threshold: usize,

    /// Number of clusters the workload clusterer maintains
    pub cluster_count: usize,

    /// EWMA weight of a new workload sample
    pub sample_weight: f64,

    /// Maximum number of physical tiles a clusterer partitioning may use
    pub max_tiles: usize,

    /// Outer retry rounds for row sampling before accepting a shortfall
    pub sample_retry_rounds: usize,
}

impl Default for TableLayoutPolicy {
    fn default() -> Self {
        Self {
            layout: LayoutType::Row,
            adapt: false,
            hybrid_row_threshold: 10,
            cluster_count: 4,
            sample_weight: 0.01,
            max_tiles: 2,
            sample_retry_rounds: 10,
        }
    }
}

impl TableLayoutPolicy {
    /// An adaptive hybrid-layout policy with the default knobs
    pub fn adaptive() -> Self {
        Self {
            layout: LayoutType::Hybrid,
            adapt: true,
            ..Self::default()
        }
    }
}

/// Column map placing every column in a single tile
pub fn row_layout(column_count: usize) -> ColumnMap {
    (0..column_count).map(|col| (0, col)).collect()
}

/// Column map placing every column in its own tile
pub fn column_layout(column_count: usize) -> ColumnMap {
    (0..column_count).map(|col| (col, 0)).collect()
}
