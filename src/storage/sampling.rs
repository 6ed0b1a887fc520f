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

//! Row sampling for optimizer statistics
//!
//! The optimizer asks a table for a uniform sample of its visible rows,
//! materializes the inlined columns of that sample into a pure-columnar
//! tile group, and estimates per-column cardinality as the distinct-value
//! count over the sample. Variable-length columns are never sampled and
//! carry cardinality zero.
//!
//! Sampling misuse (cardinality of an unsampled column, materializing
//! before sampling) is logged and answered with a sentinel, never an
//! error: a planner running on stale statistics is degraded, not broken.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::core::{Error, ItemPointer, Result, Value};
use crate::storage::data_table::DataTable;
use crate::storage::tile_group::TileGroup;

impl DataTable {
    /// Sample up to `sample_size` visible rows, replacing any previous
    /// sample. Returns the number of rows actually collected, which may
    /// fall short if visibility filtering keeps rejecting draws.
    pub fn sample_rows(&self, sample_size: usize) -> usize {
        self.sample_rows_with_rng(sample_size, &mut StdRng::from_os_rng())
    }

    /// Sampling entry point with an injected generator, so tests can use
    /// a seeded one.
    pub fn sample_rows_with_rng<R: Rng>(&self, sample_size: usize, rng: &mut R) -> usize {
        debug!(table = %self.name(), sample_size, "starting a new row sample");

        let mut state = self.sample_state.lock();

        // prior sample state is dropped as one unit
        state.pointers.clear();
        if let Some(old_id) = state.tile_group_id.take() {
            self.catalog().drop_tile_group(old_id);
        }
        state.cardinality.clear();

        let total = self.row_count() as usize;
        if total == 0 {
            return 0;
        }

        let mut row_ids = BTreeSet::new();
        if sample_size >= total {
            // deterministic path, no generator involved
            row_ids.extend(0..total);
        } else {
            let retry_rounds = self.layout_policy().sample_retry_rounds;
            let mut round = 0;
            while row_ids.len() < sample_size && round < retry_rounds {
                for _ in 0..sample_size {
                    let row_id = rng.random_range(0..total);
                    let tile_group_offset = row_id / self.tuples_per_tile_group();
                    let slot = row_id % self.tuples_per_tile_group();

                    let Ok(tile_group) = self.tile_group(tile_group_offset) else {
                        continue;
                    };
                    if self.visibility().is_visible(tile_group.header(), slot) {
                        row_ids.insert(row_id);
                    }
                    if row_ids.len() >= sample_size {
                        break;
                    }
                }
                round += 1;
            }
        }

        for &row_id in &row_ids {
            let tile_group_offset = row_id / self.tuples_per_tile_group();
            let slot = row_id % self.tuples_per_tile_group();
            if let Ok(tile_group) = self.tile_group(tile_group_offset) {
                state
                    .pointers
                    .push(ItemPointer::new(tile_group.tile_group_id(), slot));
            }
        }

        state.pointers.len()
    }

    /// Number of rows in the current sample
    pub fn optimizer_sample_size(&self) -> usize {
        self.sample_state.lock().pointers.len()
    }

    /// The sampled item pointers
    pub fn optimizer_sample(&self) -> Vec<ItemPointer> {
        self.sample_state.lock().pointers.clone()
    }

    /// The materialized sample tile group, if any
    pub fn sample_tile_group(&self) -> Option<Arc<TileGroup>> {
        let id = self.sample_state.lock().tile_group_id?;
        self.catalog().get_tile_group(id)
    }

    /// Materialize the current sample into a pure-columnar tile group
    /// covering only the inlined columns. Any prior sample group is
    /// dropped first.
    pub fn materialize_sample(&self) -> Result<()> {
        let mut state = self.sample_state.lock();

        if state.pointers.is_empty() {
            warn!(table = %self.name(), "no sample taken yet, nothing to materialize");
            return Ok(());
        }

        if let Some(old_id) = state.tile_group_id.take() {
            self.catalog().drop_tile_group(old_id);
        }

        let sample_size = state.pointers.len();
        let tile_group_id = self.catalog().next_oid();
        let sample_group = Arc::new(TileGroup::new(
            self.database_oid(),
            self.table_oid(),
            tile_group_id,
            Arc::clone(&self.sample_schema),
            self.sample_column_map.clone(),
            sample_size,
        )?);
        self.catalog()
            .add_tile_group(tile_group_id, Arc::clone(&sample_group));
        state.tile_group_id = Some(tile_group_id);

        // copy sampled values column by column through the two maps
        for pointer in &state.pointers {
            let base_group = self
                .catalog()
                .get_tile_group(pointer.tile_group_id)
                .ok_or(Error::TileGroupNotFound(pointer.tile_group_id))?;

            let sample_slot = sample_group
                .header()
                .next_empty_slot()
                .expect("sample group sized to the pointer list");

            for (sample_column, &table_column) in self.sample_columns.iter().enumerate() {
                let value = base_group.get_value(pointer.offset, table_column);
                sample_group.set_value(value, sample_slot, sample_column);
            }
        }

        Ok(())
    }

    /// Compute and cache the distinct-value count of a sample column.
    /// Returns zero when no sample has been materialized.
    pub fn compute_sample_cardinality(&self, sample_column_id: usize) -> u64 {
        if sample_column_id >= self.sample_columns.len() {
            warn!(
                table = %self.name(),
                sample_column_id, "sample column out of range"
            );
            return 0;
        }

        let mut state = self.sample_state.lock();

        let Some(tile_group_id) = state.tile_group_id else {
            warn!(
                table = %self.name(),
                sample_column_id, "sample not materialized, cardinality unavailable"
            );
            return 0;
        };
        let Some(sample_group) = self.catalog().get_tile_group(tile_group_id) else {
            return 0;
        };

        let row_count = sample_group.header().next_tuple_slot();
        let mut distinct: FxHashSet<Value> = FxHashSet::default();
        for slot in 0..row_count {
            distinct.insert(sample_group.get_value(slot, sample_column_id));
        }

        let cardinality = distinct.len() as u64;
        state.cardinality.insert(sample_column_id, cardinality);
        cardinality
    }

    /// Compute and cache the cardinality of a table column, translating
    /// through the inline-column map. Variable-length columns are not
    /// sampled and yield zero.
    pub fn compute_table_cardinality(&self, table_column_id: usize) -> u64 {
        match self.inline_column_map.get(table_column_id) {
            Some(Some(sample_column_id)) => self.compute_sample_cardinality(*sample_column_id),
            _ => {
                warn!(
                    table = %self.name(),
                    table_column_id, "column not sampled (variable length?)"
                );
                0
            }
        }
    }

    /// Cached cardinality of a sample column, zero if never computed
    pub fn sample_cardinality(&self, sample_column_id: usize) -> u64 {
        self.sample_state
            .lock()
            .cardinality
            .get(&sample_column_id)
            .copied()
            .unwrap_or(0)
    }

    /// Cached cardinality of a table column, zero for unsampled or
    /// variable-length columns
    pub fn table_cardinality(&self, table_column_id: usize) -> u64 {
        match self.inline_column_map.get(table_column_id) {
            Some(Some(sample_column_id)) => self.sample_cardinality(*sample_column_id),
            _ => 0,
        }
    }
}
