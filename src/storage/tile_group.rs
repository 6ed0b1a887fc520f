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

//! Tile group - a horizontal partition of `N` tuples
//!
//! A tile group is an ordered list of tiles plus a column map projecting
//! logical column ids onto `(tile index, within-tile column index)`. The
//! column map is the sole source of truth for locating a column; its
//! bijection onto the tile positions is validated once at construction.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::core::{Error, Oid, Result, Row, Schema, Value};
use crate::storage::tile::Tile;
use crate::storage::tile_group_header::TileGroupHeader;
use crate::storage::visibility::insertion_timestamp;

/// Mapping from logical column id to `(tile index, within-tile column
/// index)`, dense over `0..column_count`.
pub type ColumnMap = Vec<(usize, usize)>;

/// Check that a column map is a bijection onto tile positions: every
/// position unique, tile indices contiguous from zero, `within` indices
/// dense inside each tile. Returns the logical column ids of each tile
/// ordered by `within`.
pub fn validate_column_map(
    column_map: &ColumnMap,
    column_count: usize,
) -> Result<Vec<Vec<usize>>> {
    if column_map.len() != column_count {
        return Err(Error::InvalidColumnMap(format!(
            "map covers {} columns, schema has {}",
            column_map.len(),
            column_count
        )));
    }

    let tile_count = column_map
        .iter()
        .map(|&(tile, _)| tile + 1)
        .max()
        .unwrap_or(0);

    let mut seen = FxHashSet::default();
    let mut tile_columns: Vec<Vec<(usize, usize)>> = vec![Vec::new(); tile_count];
    for (logical, &(tile, within)) in column_map.iter().enumerate() {
        if !seen.insert((tile, within)) {
            return Err(Error::InvalidColumnMap(format!(
                "position ({}, {}) assigned twice",
                tile, within
            )));
        }
        tile_columns[tile].push((within, logical));
    }

    let mut layout = Vec::with_capacity(tile_count);
    for (tile, columns) in tile_columns.iter_mut().enumerate() {
        if columns.is_empty() {
            return Err(Error::InvalidColumnMap(format!("tile {} is empty", tile)));
        }
        columns.sort_unstable();
        for (expected, &(within, _)) in columns.iter().enumerate() {
            if within != expected {
                return Err(Error::InvalidColumnMap(format!(
                    "tile {} column indices not dense",
                    tile
                )));
            }
        }
        layout.push(columns.iter().map(|&(_, logical)| logical).collect());
    }
    Ok(layout)
}

/// A horizontally-partitioned slab of `N` tuple slots, composed of one or
/// more tiles.
///
/// Tile groups live in the catalog and are shared via `Arc`; all mutation
/// goes through interior locks in the tiles and atomics in the header, so
/// a handle is all a writer needs.
#[derive(Debug)]
pub struct TileGroup {
    database_oid: Oid,
    table_oid: Oid,
    tile_group_id: Oid,

    /// Logical schema of the group, the concatenation of the tile
    /// fragments per the column map
    schema: Arc<Schema>,
    tiles: Vec<Tile>,
    header: TileGroupHeader,
    capacity: usize,
    column_map: ColumnMap,
}

impl TileGroup {
    /// Build a tile group for the given logical schema and column map.
    ///
    /// Validates in one pass that the map is a bijection: every logical
    /// column has exactly one `(tile, within)` position, positions are
    /// unique, tile indices are contiguous from zero, and `within`
    /// indices are dense inside each tile.
    pub fn new(
        database_oid: Oid,
        table_oid: Oid,
        tile_group_id: Oid,
        schema: Arc<Schema>,
        column_map: ColumnMap,
        capacity: usize,
    ) -> Result<Self> {
        let layout = validate_column_map(&column_map, schema.column_count())?;

        let tiles = layout
            .iter()
            .map(|logical_ids| Tile::new(schema.fragment(logical_ids), capacity))
            .collect();

        Ok(Self {
            database_oid,
            table_oid,
            tile_group_id,
            schema,
            tiles,
            header: TileGroupHeader::new(capacity),
            capacity,
            column_map,
        })
    }

    /// Catalog id of this tile group
    pub fn tile_group_id(&self) -> Oid {
        self.tile_group_id
    }

    /// Oid of the owning database
    pub fn database_oid(&self) -> Oid {
        self.database_oid
    }

    /// Oid of the owning table; the back-reference to the table goes
    /// through the catalog, not a pointer
    pub fn table_oid(&self) -> Oid {
        self.table_oid
    }

    /// Logical schema of the group
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of tuple slots allocated
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tiles
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// The tile at the given offset
    pub fn tile(&self, tile_offset: usize) -> &Tile {
        &self.tiles[tile_offset]
    }

    /// The MVCC header
    pub fn header(&self) -> &TileGroupHeader {
        &self.header
    }

    /// The column map
    pub fn column_map(&self) -> &ColumnMap {
        &self.column_map
    }

    /// Number of slots claimed so far
    pub fn active_tuple_count(&self) -> usize {
        self.header.next_tuple_slot()
    }

    /// Locate a logical column: `(tile index, within-tile column index)`.
    /// O(1) after construction.
    pub fn locate(&self, column_id: usize) -> (usize, usize) {
        self.column_map[column_id]
    }

    /// Atomically claim the next free slot and copy each column of the
    /// row to its mapped position. Returns `None` when the group is full.
    pub fn insert(&self, row: &Row) -> Option<usize> {
        debug_assert_eq!(row.len(), self.schema.column_count());

        let slot = self.header.next_empty_slot()?;
        for (column_id, value) in row.iter().enumerate() {
            let (tile, within) = self.column_map[column_id];
            self.tiles[tile].set_value(value.clone(), slot, within);
        }
        self.header.set_begin_ts(slot, insertion_timestamp());
        Some(slot)
    }

    /// Read the value of a logical column at a slot
    pub fn get_value(&self, slot: usize, column_id: usize) -> Value {
        let (tile, within) = self.locate(column_id);
        self.tiles[tile].get_value(slot, within)
    }

    /// Write the value of a logical column at a slot
    pub fn set_value(&self, value: Value, slot: usize, column_id: usize) {
        let (tile, within) = self.locate(column_id);
        self.tiles[tile].set_value(value, slot, within);
    }

    /// Fraction of columns whose current placement differs from the
    /// target map, in `[0, 1]`. Drives the transformation threshold.
    pub fn schema_difference(&self, target_map: &ColumnMap) -> f64 {
        assert_eq!(target_map.len(), self.column_map.len());
        if self.column_map.is_empty() {
            return 0.0;
        }
        let diff = self
            .column_map
            .iter()
            .zip(target_map.iter())
            .filter(|(current, target)| current != target)
            .count();
        diff as f64 / self.column_map.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, SchemaColumn};

    fn schema_abc() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            SchemaColumn::simple(0, "a", DataType::Integer),
            SchemaColumn::simple(1, "b", DataType::Integer),
            SchemaColumn::simple(2, "c", DataType::Integer),
        ]))
    }

    #[test]
    fn test_rejects_duplicate_position() {
        let err = TileGroup::new(1, 1, 1, schema_abc(), vec![(0, 0), (0, 0), (0, 1)], 4);
        assert!(matches!(err, Err(Error::InvalidColumnMap(_))));
    }

    #[test]
    fn test_rejects_sparse_within() {
        let err = TileGroup::new(1, 1, 1, schema_abc(), vec![(0, 0), (0, 2), (1, 0)], 4);
        assert!(matches!(err, Err(Error::InvalidColumnMap(_))));
    }

    #[test]
    fn test_hybrid_map_roundtrip() {
        let group =
            TileGroup::new(1, 1, 1, schema_abc(), vec![(0, 0), (0, 1), (1, 0)], 4).unwrap();
        assert_eq!(group.tile_count(), 2);
        assert_eq!(group.locate(2), (1, 0));

        let row = Row::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
        let slot = group.insert(&row).unwrap();
        assert_eq!(group.get_value(slot, 0), Value::from(1));
        assert_eq!(group.get_value(slot, 1), Value::from(2));
        assert_eq!(group.get_value(slot, 2), Value::from(3));
    }

    #[test]
    fn test_insert_returns_none_when_full() {
        let group =
            TileGroup::new(1, 1, 1, schema_abc(), vec![(0, 0), (0, 1), (0, 2)], 1).unwrap();
        let row = Row::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert!(group.insert(&row).is_some());
        assert!(group.insert(&row).is_none());
    }

    #[test]
    fn test_schema_difference() {
        let group =
            TileGroup::new(1, 1, 1, schema_abc(), vec![(0, 0), (0, 1), (0, 2)], 4).unwrap();
        assert_eq!(group.schema_difference(&vec![(0, 0), (0, 1), (0, 2)]), 0.0);
        let diff = group.schema_difference(&vec![(0, 0), (0, 1), (1, 0)]);
        assert!((diff - 1.0 / 3.0).abs() < 1e-9);
    }
}
