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

//! Row type for Tessera - an ordered list of values
//!
//! A row is the logical tuple handed to the insertion path. Physical
//! placement of its values across tiles is decided by the tile group's
//! column map, never by the row itself.

use std::hash::{Hash, Hasher};

use super::value::Value;

/// An ordered list of values forming one logical tuple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a row from values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of values in the row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at the given column offset
    pub fn get(&self, offset: usize) -> &Value {
        &self.values[offset]
    }

    /// Iterate over the values in column order
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Project a subset of columns into a new row, in the given order.
    /// Used to materialize index keys from base rows.
    pub fn project(&self, column_ids: &[usize]) -> Row {
        Row {
            values: column_ids.iter().map(|&id| self.values[id].clone()).collect(),
        }
    }
}

impl Hash for Row {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.len().hash(state);
        for v in &self.values {
            v.hash(state);
        }
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

impl std::ops::Index<usize> for Row {
    type Output = Value;

    fn index(&self, offset: usize) -> &Value {
        &self.values[offset]
    }
}
