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

//! Schema types for Tessera - table and column definitions

use std::fmt;

use super::types::DataType;

/// A column definition in a table schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    /// Unique identifier for the column (0-based index in the table schema)
    pub id: usize,

    /// Column name
    pub name: String,

    /// Data type of the column
    pub data_type: DataType,

    /// Whether the column can contain NULL values
    pub nullable: bool,
}

impl SchemaColumn {
    /// Create a new column definition
    pub fn new(id: usize, name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            id,
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Create a non-nullable column
    pub fn simple(id: usize, name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(id, name, data_type, false)
    }

    /// Create a nullable column
    pub fn nullable(id: usize, name: impl Into<String>, data_type: DataType) -> Self {
        Self::new(id, name, data_type, true)
    }
}

impl fmt::Display for SchemaColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if !self.nullable {
            write!(f, " NOT NULL")?;
        }
        Ok(())
    }
}

/// An ordered list of column definitions.
///
/// The column count is fixed after construction; schemas are shared
/// read-only once a table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<SchemaColumn>,
}

impl Schema {
    /// Create a schema from a column list
    pub fn new(columns: Vec<SchemaColumn>) -> Self {
        Self { columns }
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The column at the given offset
    pub fn column(&self, offset: usize) -> &SchemaColumn {
        &self.columns[offset]
    }

    /// All columns in order
    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    /// Whether the column at the given offset allows NULL
    pub fn allows_null(&self, offset: usize) -> bool {
        self.columns[offset].nullable
    }

    /// Data type of the column at the given offset
    pub fn data_type(&self, offset: usize) -> DataType {
        self.columns[offset].data_type
    }

    /// Find a column offset by name
    pub fn column_offset(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Build a schema fragment from a subset of this schema's columns,
    /// in the given order. Used to derive per-tile schemas.
    pub fn fragment(&self, column_ids: &[usize]) -> Schema {
        let columns = column_ids
            .iter()
            .map(|&id| self.columns[id].clone())
            .collect();
        Schema { columns }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, ")")
    }
}
