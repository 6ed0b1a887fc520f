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

//! Tile - a column-slab backing store
//!
//! A tile holds a contiguous subset of a tile group's columns for all `N`
//! tuple slots. Storage is column oriented: one slab per column, each
//! prefilled with typed nulls so a slot reads as NULL until written.

use parking_lot::RwLock;

use crate::core::{Schema, Value};

/// Fixed-capacity column slabs for a subset of columns.
///
/// Tiles are owned solely by their tile group. Row and column indices are
/// validated by the column map before they get here, so out-of-range
/// access is a programmer error.
#[derive(Debug)]
pub struct Tile {
    schema: Schema,
    capacity: usize,
    columns: Vec<RwLock<Vec<Value>>>,
}

impl Tile {
    /// Allocate a tile for the given schema fragment and slot count
    pub fn new(schema: Schema, capacity: usize) -> Self {
        let columns = schema
            .columns()
            .iter()
            .map(|col| RwLock::new(vec![Value::null(col.data_type); capacity]))
            .collect();
        Self {
            schema,
            capacity,
            columns,
        }
    }

    /// The schema fragment backing this tile
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of columns in this tile
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of tuple slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read the value at (row, column)
    pub fn get_value(&self, row: usize, column: usize) -> Value {
        assert!(row < self.capacity, "tile row out of range");
        self.columns[column].read()[row].clone()
    }

    /// Write the value at (row, column)
    pub fn set_value(&self, value: Value, row: usize, column: usize) {
        assert!(row < self.capacity, "tile row out of range");
        self.columns[column].write()[row] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, SchemaColumn};

    #[test]
    fn test_reads_null_until_written() {
        let schema = Schema::new(vec![SchemaColumn::simple(0, "a", DataType::Integer)]);
        let tile = Tile::new(schema, 4);

        assert!(tile.get_value(2, 0).is_null());
        assert_eq!(tile.get_value(2, 0).data_type(), DataType::Integer);

        tile.set_value(Value::from(42), 2, 0);
        assert_eq!(tile.get_value(2, 0), Value::from(42));
        assert!(tile.get_value(3, 0).is_null());
    }
}
