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

//! Core type definitions for Tessera
//!
//! This module defines the fundamental types: DataType, Oid, ItemPointer,
//! LayoutType and IndexConstraintType.

use std::fmt;

/// Object identifier vended by the catalog manager.
///
/// Ids are globally unique and monotonically increasing.
pub type Oid = u64;

/// SQL data types supported by the storage core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DataType {
    /// NULL data type, used for unknown/unspecified types
    #[default]
    Null = 0,

    /// 64-bit signed integer
    Integer = 1,

    /// 64-bit floating point number
    Float = 2,

    /// Boolean true/false
    Boolean = 3,

    /// Timestamp with timezone (stored as UTC)
    Timestamp = 4,

    /// UTF-8 text string, stored out of line
    Text = 5,

    /// Raw byte string, stored out of line
    Blob = 6,
}

impl DataType {
    /// Returns true if this type is numeric (INTEGER or FLOAT)
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Returns true if values of this type are stored inline (fixed width).
    ///
    /// Text and Blob are variable length and never mapped into optimizer
    /// samples.
    pub fn is_inlined(&self) -> bool {
        !matches!(self, DataType::Text | DataType::Blob)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Null => "NULL",
            DataType::Integer => "INTEGER",
            DataType::Float => "FLOAT",
            DataType::Boolean => "BOOLEAN",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Text => "TEXT",
            DataType::Blob => "BLOB",
        };
        write!(f, "{}", name)
    }
}

/// Physical layout selector for freshly allocated tile groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutType {
    /// All columns in a single tile
    #[default]
    Row,
    /// One tile per column
    Column,
    /// Clusterer-driven partitioning with a bounded number of tiles
    Hybrid,
}

/// Constraint class of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexConstraintType {
    /// Primary key index
    PrimaryKey,
    /// Unique secondary index
    Unique,
    /// Plain secondary index
    Default,
}

/// Physical location of a row: which tile group, and which slot inside it.
///
/// The tile group id is the catalog id, not the offset in the owning
/// table's tile group list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemPointer {
    /// Catalog id of the tile group holding the row
    pub tile_group_id: Oid,
    /// Slot offset inside the tile group
    pub offset: usize,
}

impl ItemPointer {
    /// Create a new item pointer
    pub fn new(tile_group_id: Oid, offset: usize) -> Self {
        Self {
            tile_group_id,
            offset,
        }
    }
}

impl fmt::Display for ItemPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.tile_group_id, self.offset)
    }
}
