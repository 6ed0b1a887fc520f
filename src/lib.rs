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

//! # Tessera - hybrid row/column table storage core
//!
//! Tessera is the table storage core of a hybrid relational engine: it
//! lays tuples out across column tiles, keeps insertion cheap under
//! concurrent writers, and re-partitions columns online to match the
//! observed workload. A memoized plan forest with a pattern binding
//! engine drives rule-based exploration in the companion optimizer.
//!
//! ## Key pieces
//!
//! - **Tile groups** - horizontal partitions of `N` tuples, each an
//!   ordered list of column tiles plus a column map
//! - **Adaptive layout** - a workload clusterer derives new column maps;
//!   tile groups are transformed in place and republished atomically
//!   through the catalog
//! - **Optimizer sampling** - uniform visible-row samples materialized
//!   columnar-only, with distinct-count cardinality estimation
//! - **Pattern binding** - exhaustive, duplicate-free enumeration of
//!   plan subtrees matching a tree pattern, with lazy rule exploration
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera::core::{DataType, Row, Schema, SchemaColumn, Value};
//! use tessera::storage::{Catalog, CommittedVisibility, DataTable, TableLayoutPolicy};
//!
//! let catalog = Arc::new(Catalog::new());
//! let schema = Schema::new(vec![
//!     SchemaColumn::simple(0, "id", DataType::Integer),
//!     SchemaColumn::nullable(1, "name", DataType::Text),
//! ]);
//! let table = DataTable::new(
//!     Arc::clone(&catalog),
//!     Arc::new(CommittedVisibility),
//!     1,
//!     2,
//!     "users",
//!     schema,
//!     1024,
//!     TableLayoutPolicy::default(),
//! )
//! .unwrap();
//!
//! let location = table
//!     .insert_row(&Row::from(vec![Value::from(1), Value::from("alice")]))
//!     .unwrap();
//! let group = table.tile_group_by_id(location.tile_group_id).unwrap();
//! assert_eq!(group.get_value(location.offset, 0), Value::from(1));
//! ```
//!
//! ## Modules
//!
//! - [`core`] - fundamental types ([`DataType`], [`Value`], [`Row`],
//!   [`Schema`], [`Error`])
//! - [`storage`] - tables, tile groups, layout, sampling, indexes
//! - [`optimizer`] - memo forest, patterns, binding iterators

pub mod core;
pub mod optimizer;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{
    DataType, Error, IndexConstraintType, ItemPointer, LayoutType, Oid, Result, Row, Schema,
    SchemaColumn, Value,
};

pub use crate::storage::{
    Catalog, Clusterer, ColumnMap, CommittedVisibility, DataTable, ForeignKey, HashIndex, Index,
    Sample, TableLayoutPolicy, Tile, TileGroup, TileGroupHeader, VisibilityChecker,
};

pub use crate::optimizer::{
    GroupBindingIterator, GroupId, ItemBindingIterator, Memo, OpPlanNode, OpType, Operator,
    Pattern, Rule,
};
