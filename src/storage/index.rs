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

//! Index contract and a hash index implementation
//!
//! The storage layer fans every inserted row out to the table's indexes.
//! Storage does NOT enforce uniqueness: primary/unique visibility checks
//! belong to the transaction manager, and callers composing updates must
//! prevent duplicates themselves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::core::{IndexConstraintType, ItemPointer, Oid, Row, Schema};

/// Secondary access path over a table
pub trait Index: Send + Sync {
    /// Catalog id of the index
    fn oid(&self) -> Oid;

    /// Index name
    fn name(&self) -> &str;

    /// Constraint class (primary key, unique, plain)
    fn index_type(&self) -> IndexConstraintType;

    /// Schema of the key tuples
    fn key_schema(&self) -> &Schema;

    /// Table column offsets the key is built from, in key order
    fn indexed_columns(&self) -> &[usize];

    /// Insert an entry mapping a key to a row location. Returns true on
    /// success; duplicates are accepted, see the module note.
    fn insert_entry(&self, key: Row, location: ItemPointer) -> bool;

    /// All locations recorded for a key
    fn scan_key(&self, key: &Row) -> Vec<ItemPointer>;

    /// Bump the index's tuple counter
    fn increase_number_of_tuples_by(&self, amount: u64);

    /// Current tuple counter
    fn number_of_tuples(&self) -> u64;
}

type PostingList = SmallVec<[ItemPointer; 1]>;

/// In-memory hash index over full key rows
pub struct HashIndex {
    oid: Oid,
    name: String,
    index_type: IndexConstraintType,
    key_schema: Schema,
    indexed_columns: Vec<usize>,
    entries: RwLock<HashMap<Row, PostingList, ahash::RandomState>>,
    tuple_count: AtomicU64,
}

impl HashIndex {
    /// Create a hash index over the given table columns
    pub fn new(
        oid: Oid,
        name: impl Into<String>,
        index_type: IndexConstraintType,
        table_schema: &Schema,
        indexed_columns: Vec<usize>,
    ) -> Self {
        let key_schema = table_schema.fragment(&indexed_columns);
        Self {
            oid,
            name: name.into(),
            index_type,
            key_schema,
            indexed_columns,
            entries: RwLock::new(HashMap::default()),
            tuple_count: AtomicU64::new(0),
        }
    }

    /// Number of distinct keys currently stored
    pub fn key_count(&self) -> usize {
        self.entries.read().len()
    }
}

impl Index for HashIndex {
    fn oid(&self) -> Oid {
        self.oid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn index_type(&self) -> IndexConstraintType {
        self.index_type
    }

    fn key_schema(&self) -> &Schema {
        &self.key_schema
    }

    fn indexed_columns(&self) -> &[usize] {
        &self.indexed_columns
    }

    fn insert_entry(&self, key: Row, location: ItemPointer) -> bool {
        self.entries.write().entry(key).or_default().push(location);
        true
    }

    fn scan_key(&self, key: &Row) -> Vec<ItemPointer> {
        self.entries
            .read()
            .get(key)
            .map(|postings| postings.to_vec())
            .unwrap_or_default()
    }

    fn increase_number_of_tuples_by(&self, amount: u64) {
        self.tuple_count.fetch_add(amount, Ordering::Relaxed);
    }

    fn number_of_tuples(&self) -> u64 {
        self.tuple_count.load(Ordering::Relaxed)
    }
}
