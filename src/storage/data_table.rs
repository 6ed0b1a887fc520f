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

//! DataTable - the logical table over an append-only tile group list
//!
//! A table owns its schema, its indexes and foreign keys, a default
//! partitioning kept current by the workload clusterer, and the sampling
//! state used by the query optimizer. Tile groups themselves are owned by
//! the catalog; the table only records their ids, in insertion order, and
//! the last id is the only insertion target.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{
    Error, IndexConstraintType, ItemPointer, LayoutType, Oid, Result, Row, Schema,
};
use crate::storage::catalog::Catalog;
use crate::storage::clusterer::{Clusterer, Sample};
use crate::storage::index::Index;
use crate::storage::layout::{column_layout, row_layout, TableLayoutPolicy};
use crate::storage::tile_group::{validate_column_map, ColumnMap, TileGroup};
use crate::storage::visibility::VisibilityChecker;

/// Foreign key constraint metadata. Cross-table validation is out of
/// scope for the storage core; the list is bookkeeping for upper layers.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    /// Constraint name
    pub constraint_name: String,
    /// Referenced table
    pub sink_table_oid: Oid,
    /// Referencing columns in this table, in constraint order
    pub source_column_ids: Vec<usize>,
    /// Referenced columns in the sink table, in constraint order
    pub sink_column_ids: Vec<usize>,
}

/// Optimizer sampling state, guarded by the sample mutex as one unit so
/// the pointer list, the materialized tile group id and the cardinality
/// cache always change together from an observer's viewpoint.
#[derive(Debug, Default)]
pub(crate) struct SampleState {
    pub(crate) pointers: Vec<ItemPointer>,
    pub(crate) tile_group_id: Option<Oid>,
    pub(crate) cardinality: FxHashMap<usize, u64>,
}

/// The logical table: layout core of the storage engine
pub struct DataTable {
    database_oid: Oid,
    table_oid: Oid,
    name: String,
    schema: Arc<Schema>,
    tuples_per_tile_group: usize,
    policy: TableLayoutPolicy,
    catalog: Arc<Catalog>,
    visibility: Arc<dyn VisibilityChecker>,

    /// Append-only list of tile group ids; never shrunk
    tile_groups: RwLock<Vec<Oid>>,
    indexes: RwLock<Vec<Arc<dyn Index>>>,
    foreign_keys: RwLock<Vec<ForeignKey>>,
    has_primary_key: AtomicBool,
    unique_constraint_count: AtomicUsize,

    /// Target partitioning for transformation and hybrid allocation
    default_partition: RwLock<ColumnMap>,
    /// Workload samples awaiting the clusterer
    workload_samples: Mutex<Vec<Sample>>,

    row_count_exact: AtomicU64,
    row_count_approx: Mutex<f64>,
    dirty: AtomicBool,

    pub(crate) sample_state: Mutex<SampleState>,
    /// Table column id to sample column id, `None` for variable-length
    /// columns which are never sampled
    pub(crate) inline_column_map: Vec<Option<usize>>,
    /// Sample column id to table column id
    pub(crate) sample_columns: Vec<usize>,
    /// Schema of the materialized sample (inlined columns only)
    pub(crate) sample_schema: Arc<Schema>,
    /// Pure-columnar map for the sample tile group
    pub(crate) sample_column_map: ColumnMap,
}

impl DataTable {
    /// Create a table with one seeded tile group.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<Catalog>,
        visibility: Arc<dyn VisibilityChecker>,
        database_oid: Oid,
        table_oid: Oid,
        name: impl Into<String>,
        schema: Schema,
        tuples_per_tile_group: usize,
        policy: TableLayoutPolicy,
    ) -> Result<Self> {
        assert!(tuples_per_tile_group > 0, "tile group capacity must be positive");

        let schema = Arc::new(schema);
        let column_count = schema.column_count();

        // only inlined columns are mapped into optimizer samples
        let mut inline_column_map = Vec::with_capacity(column_count);
        let mut sample_columns = Vec::new();
        for col in 0..column_count {
            if schema.data_type(col).is_inlined() {
                inline_column_map.push(Some(sample_columns.len()));
                sample_columns.push(col);
            } else {
                inline_column_map.push(None);
            }
        }
        let sample_schema = Arc::new(schema.fragment(&sample_columns));
        let sample_column_map = column_layout(sample_columns.len());

        let table = Self {
            database_oid,
            table_oid,
            name: name.into(),
            schema,
            tuples_per_tile_group,
            policy,
            catalog,
            visibility,
            tile_groups: RwLock::new(Vec::new()),
            indexes: RwLock::new(Vec::new()),
            foreign_keys: RwLock::new(Vec::new()),
            has_primary_key: AtomicBool::new(false),
            unique_constraint_count: AtomicUsize::new(0),
            default_partition: RwLock::new(row_layout(column_count)),
            workload_samples: Mutex::new(Vec::new()),
            row_count_exact: AtomicU64::new(0),
            row_count_approx: Mutex::new(0.0),
            dirty: AtomicBool::new(false),
            sample_state: Mutex::new(SampleState::default()),
            inline_column_map,
            sample_columns,
            sample_schema,
            sample_column_map,
        };

        table.add_default_tile_group()?;
        Ok(table)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Oid of the owning database
    pub fn database_oid(&self) -> Oid {
        self.database_oid
    }

    /// Catalog oid of this table
    pub fn table_oid(&self) -> Oid {
        self.table_oid
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table schema
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Slot capacity of each tile group
    pub fn tuples_per_tile_group(&self) -> usize {
        self.tuples_per_tile_group
    }

    /// The layout policy passed at construction
    pub fn layout_policy(&self) -> &TableLayoutPolicy {
        &self.policy
    }

    /// The visibility checker consulted by the sampler
    pub(crate) fn visibility(&self) -> &Arc<dyn VisibilityChecker> {
        &self.visibility
    }

    /// The shared catalog
    pub(crate) fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    // =========================================================================
    // Tuple helper operations
    // =========================================================================

    fn check_nulls(&self, row: &Row) -> Result<()> {
        for col in 0..self.schema.column_count() {
            if row.get(col).is_null() && !self.schema.allows_null(col) {
                return Err(Error::NotNullConstraint {
                    column: self.schema.column(col).name.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_constraints(&self, row: &Row) -> Result<()> {
        // NOT NULL only; other constraints are deferred to upper layers
        self.check_nulls(row)
    }

    /// Claim a slot in the last tile group, appending a fresh group on
    /// overflow. The loop terminates because `add_default_tile_group`
    /// either appends a group with free slots or observes that a
    /// concurrent appender already did.
    fn get_tuple_slot(&self, row: &Row, check_constraints: bool) -> Result<ItemPointer> {
        if row.len() != self.schema.column_count() {
            return Err(Error::RowColumnsNotMatch {
                expected: self.schema.column_count(),
                got: row.len(),
            });
        }
        if check_constraints {
            self.check_constraints(row)?;
        }

        loop {
            let last_offset = {
                let groups = self.tile_groups.read();
                debug_assert!(!groups.is_empty());
                groups.len() - 1
            };
            let tile_group = self.tile_group(last_offset)?;

            if let Some(slot) = tile_group.insert(row) {
                return Ok(ItemPointer::new(tile_group.tile_group_id(), slot));
            }
            self.add_default_tile_group()?;
        }
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert a row: constraint check, slot reservation, fan-out to all
    /// indexes, counter bump.
    pub fn insert_row(&self, row: &Row) -> Result<ItemPointer> {
        let location = self.get_tuple_slot(row, true)?;

        self.insert_in_indexes(row, location);

        self.increase_number_of_rows_by(1.0);
        self.row_count_exact.fetch_add(1, Ordering::Relaxed);
        for index in self.indexes.read().iter() {
            index.increase_number_of_tuples_by(1);
        }

        Ok(location)
    }

    /// Insert a new version of an existing row: constraints are checked
    /// but only secondary indexes are updated, the primary entry already
    /// points at the version chain.
    pub fn insert_version(&self, row: &Row) -> Result<ItemPointer> {
        let location = self.get_tuple_slot(row, true)?;

        self.insert_in_secondary_indexes(row, location);

        self.increase_number_of_rows_by(1.0);
        self.row_count_exact.fetch_add(1, Ordering::Relaxed);

        Ok(location)
    }

    /// Insert an empty version placeholder: no constraint checks, only
    /// secondary indexes are updated.
    pub fn insert_empty_version(&self, row: &Row) -> Result<ItemPointer> {
        let location = self.get_tuple_slot(row, false)?;

        self.insert_in_secondary_indexes(row, location);

        self.increase_number_of_rows_by(1.0);
        self.row_count_exact.fetch_add(1, Ordering::Relaxed);

        Ok(location)
    }

    /// Fan a row out to every index. Storage does not enforce
    /// primary/unique visibility, the transaction manager does.
    fn insert_in_indexes(&self, row: &Row, location: ItemPointer) {
        for index in self.indexes.read().iter().rev() {
            let key = row.project(index.indexed_columns());
            let inserted = index.insert_entry(key, location);
            debug_assert!(inserted, "index insert must succeed");
        }
    }

    /// Fan a row out to the plain secondary indexes only
    fn insert_in_secondary_indexes(&self, row: &Row, location: ItemPointer) {
        for index in self.indexes.read().iter().rev() {
            match index.index_type() {
                IndexConstraintType::PrimaryKey | IndexConstraintType::Unique => {}
                IndexConstraintType::Default => {
                    let key = row.project(index.indexed_columns());
                    let inserted = index.insert_entry(key, location);
                    debug_assert!(inserted, "index insert must succeed");
                }
            }
        }
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Bump the approximate row count
    pub fn increase_number_of_rows_by(&self, amount: f64) {
        *self.row_count_approx.lock() += amount;
        self.dirty.store(true, Ordering::Relaxed);
    }

    /// Lower the approximate row count
    pub fn decrease_number_of_rows_by(&self, amount: f64) {
        *self.row_count_approx.lock() -= amount;
        self.dirty.store(true, Ordering::Relaxed);
    }

    /// Overwrite the approximate row count
    pub fn set_number_of_rows(&self, count: f64) {
        *self.row_count_approx.lock() = count;
        self.dirty.store(true, Ordering::Relaxed);
    }

    /// Approximate row count
    pub fn number_of_rows(&self) -> f64 {
        *self.row_count_approx.lock()
    }

    /// Exact row count
    pub fn row_count(&self) -> u64 {
        self.row_count_exact.load(Ordering::Relaxed)
    }

    /// Whether the approximate counter changed since the last reset
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Relaxed)
    }

    /// Clear the dirty flag
    pub fn reset_dirty(&self) {
        self.dirty.store(false, Ordering::Relaxed);
    }

    // =========================================================================
    // Tile groups
    // =========================================================================

    /// Column map for a freshly allocated tile group per the layout
    /// policy. Hybrid layout follows the clusterer-maintained default
    /// partition, falling back to row for narrow tables.
    fn tile_group_layout(&self) -> ColumnMap {
        let column_count = self.schema.column_count();
        let layout = if self.policy.adapt {
            self.policy.layout
        } else {
            LayoutType::Row
        };
        match layout {
            LayoutType::Row => row_layout(column_count),
            LayoutType::Column => column_layout(column_count),
            LayoutType::Hybrid => {
                if column_count < self.policy.hybrid_row_threshold {
                    row_layout(column_count)
                } else {
                    self.default_partition.read().clone()
                }
            }
        }
    }

    /// Append a tile group laid out per policy. Returns `None` when a
    /// concurrent appender won the race and the last group still has
    /// free slots.
    pub fn add_default_tile_group(&self) -> Result<Option<Oid>> {
        let column_map = self.tile_group_layout();
        let tile_group_id = self.catalog.next_oid();
        let tile_group = Arc::new(TileGroup::new(
            self.database_oid,
            self.table_oid,
            tile_group_id,
            Arc::clone(&self.schema),
            column_map,
            self.tuples_per_tile_group,
        )?);

        let mut groups = self.tile_groups.write();
        if let Some(&last_id) = groups.last() {
            let last = self
                .catalog
                .get_tile_group(last_id)
                .ok_or(Error::TileGroupNotFound(last_id))?;
            if last.active_tuple_count() < last.capacity() {
                // another thread already appended; discard the new group
                return Ok(None);
            }
        }

        groups.push(tile_group_id);
        self.catalog.add_tile_group(tile_group_id, tile_group);
        Ok(Some(tile_group_id))
    }

    /// Unconditionally append a tile group under a known id. Used by
    /// recovery, which replays the id sequence.
    pub fn add_tile_group_with_oid(&self, tile_group_id: Oid) -> Result<Oid> {
        let tile_group = Arc::new(TileGroup::new(
            self.database_oid,
            self.table_oid,
            tile_group_id,
            Arc::clone(&self.schema),
            row_layout(self.schema.column_count()),
            self.tuples_per_tile_group,
        )?);

        let mut groups = self.tile_groups.write();
        groups.push(tile_group_id);
        self.catalog.add_tile_group(tile_group_id, tile_group);
        Ok(tile_group_id)
    }

    /// Number of tile groups in the table
    pub fn tile_group_count(&self) -> usize {
        self.tile_groups.read().len()
    }

    /// Tile group handle by offset in the table's list
    pub fn tile_group(&self, tile_group_offset: usize) -> Result<Arc<TileGroup>> {
        let tile_group_id = {
            let groups = self.tile_groups.read();
            *groups.get(tile_group_offset).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "tile group offset {} out of range ({} groups)",
                    tile_group_offset,
                    groups.len()
                ))
            })?
        };
        self.tile_group_by_id(tile_group_id)
    }

    /// Tile group handle by catalog id
    pub fn tile_group_by_id(&self, tile_group_id: Oid) -> Result<Arc<TileGroup>> {
        self.catalog
            .get_tile_group(tile_group_id)
            .ok_or(Error::TileGroupNotFound(tile_group_id))
    }

    // =========================================================================
    // Layout transformation
    // =========================================================================

    /// Re-lay a tile group out per the default partition when its current
    /// layout diverges from it by at least `theta`.
    ///
    /// The new group is built aside under the same id, filled column by
    /// column, given a byte-exact copy of the MVCC header and then
    /// published through the catalog. In-flight readers keep the old
    /// handle; new readers observe the replacement.
    pub fn transform_tile_group(
        &self,
        tile_group_offset: usize,
        theta: f64,
    ) -> Result<Option<Arc<TileGroup>>> {
        let tile_group = self.tile_group(tile_group_offset)?;
        let target_map = self.default_partition.read().clone();

        if tile_group.schema_difference(&target_map) < theta {
            debug!(
                table = %self.name,
                tile_group_offset,
                "layout within threshold, transformation skipped"
            );
            return Ok(None);
        }

        let new_group = Arc::new(TileGroup::new(
            tile_group.database_oid(),
            tile_group.table_oid(),
            tile_group.tile_group_id(),
            Arc::clone(tile_group.schema()),
            target_map,
            tile_group.capacity(),
        )?);

        // copy column at a time; columns land in disjoint slabs so the
        // copies are independent
        let capacity = tile_group.capacity();
        (0..self.schema.column_count())
            .into_par_iter()
            .for_each(|column_id| {
                for slot in 0..capacity {
                    new_group.set_value(tile_group.get_value(slot, column_id), slot, column_id);
                }
            });

        new_group.header().copy_from(tile_group.header());

        self.catalog
            .add_tile_group(tile_group.tile_group_id(), Arc::clone(&new_group));

        Ok(Some(new_group))
    }

    // =========================================================================
    // Workload clustering
    // =========================================================================

    /// Queue a workload sample for the clusterer
    pub fn record_sample(&self, sample: Sample) {
        self.workload_samples.lock().push(sample);
    }

    /// Number of queued workload samples
    pub fn pending_sample_count(&self) -> usize {
        self.workload_samples.lock().len()
    }

    /// Drain queued samples through the clusterer and replace the default
    /// partition with its partitioning. No-op when nothing is queued.
    pub fn update_default_partition(&self) {
        let column_count = self.schema.column_count();
        let mut clusterer = Clusterer::new(
            self.policy.cluster_count,
            column_count,
            self.policy.sample_weight,
        );

        {
            let mut samples = self.workload_samples.lock();
            if samples.is_empty() {
                return;
            }
            for sample in samples.iter() {
                clusterer.process_sample(sample);
            }
            samples.clear();
        }

        *self.default_partition.write() = clusterer.partitioning(self.policy.max_tiles);
    }

    /// The current default partition
    pub fn default_partition(&self) -> ColumnMap {
        self.default_partition.read().clone()
    }

    /// Replace the default partition directly, validating the map first.
    /// Recovery and tests use this; the normal path goes through
    /// [`DataTable::update_default_partition`].
    pub fn set_default_partition(&self, column_map: ColumnMap) -> Result<()> {
        validate_column_map(&column_map, self.schema.column_count())?;
        *self.default_partition.write() = column_map;
        Ok(())
    }

    /// Per-tile column counts of the default partition
    pub fn column_map_stats(&self) -> FxHashMap<usize, usize> {
        let mut stats = FxHashMap::default();
        for &(tile, _) in self.default_partition.read().iter() {
            *stats.entry(tile).or_insert(0) += 1;
        }
        stats
    }

    // =========================================================================
    // Indexes
    // =========================================================================

    /// Register an index
    pub fn add_index(&self, index: Arc<dyn Index>) {
        match index.index_type() {
            IndexConstraintType::PrimaryKey => {
                self.has_primary_key.store(true, Ordering::Relaxed);
            }
            IndexConstraintType::Unique => {
                self.unique_constraint_count.fetch_add(1, Ordering::Relaxed);
            }
            IndexConstraintType::Default => {}
        }
        self.indexes.write().push(index);
    }

    /// Look an index up by oid
    pub fn index_with_oid(&self, index_oid: Oid) -> Option<Arc<dyn Index>> {
        self.indexes
            .read()
            .iter()
            .find(|index| index.oid() == index_oid)
            .cloned()
    }

    /// Remove an index by oid
    pub fn drop_index_with_oid(&self, index_oid: Oid) {
        self.indexes.write().retain(|index| index.oid() != index_oid);
    }

    /// The index at the given offset
    pub fn index(&self, index_offset: usize) -> Option<Arc<dyn Index>> {
        self.indexes.read().get(index_offset).cloned()
    }

    /// Number of registered indexes
    pub fn index_count(&self) -> usize {
        self.indexes.read().len()
    }

    /// Whether a primary key index has been registered
    pub fn has_primary_key(&self) -> bool {
        self.has_primary_key.load(Ordering::Relaxed)
    }

    /// Number of registered unique constraints
    pub fn unique_constraint_count(&self) -> usize {
        self.unique_constraint_count.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Foreign keys
    // =========================================================================

    /// Register a foreign key
    pub fn add_foreign_key(&self, key: ForeignKey) {
        self.foreign_keys.write().push(key);
    }

    /// The foreign key at the given offset
    pub fn foreign_key(&self, key_offset: usize) -> Option<ForeignKey> {
        self.foreign_keys.read().get(key_offset).cloned()
    }

    /// Remove the foreign key at the given offset
    pub fn drop_foreign_key(&self, key_offset: usize) {
        let mut keys = self.foreign_keys.write();
        assert!(key_offset < keys.len(), "foreign key offset out of range");
        keys.remove(key_offset);
    }

    /// Number of registered foreign keys
    pub fn foreign_key_count(&self) -> usize {
        self.foreign_keys.read().len()
    }
}

impl Drop for DataTable {
    fn drop(&mut self) {
        for &tile_group_id in self.tile_groups.read().iter() {
            self.catalog.drop_tile_group(tile_group_id);
        }
        if let Some(sample_id) = self.sample_state.lock().tile_group_id.take() {
            self.catalog.drop_tile_group(sample_id);
        }
    }
}

impl std::fmt::Debug for DataTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("name", &self.name)
            .field("table_oid", &self.table_oid)
            .field("tile_group_count", &self.tile_group_count())
            .field("row_count", &self.row_count())
            .finish()
    }
}
