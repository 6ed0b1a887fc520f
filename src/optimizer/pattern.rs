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

//! Tree patterns for rule matching
//!
//! A pattern is an immutable tree of operator kinds. The `Leaf` kind is
//! the wildcard: it matches any subtree and binds it as a single leaf
//! node. Patterns are built once per rule and shared.

use crate::optimizer::operator::OpType;

/// Tree template matched against the memo forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    op_type: OpType,
    children: Vec<Pattern>,
}

impl Pattern {
    /// A pattern node with no children
    pub fn new(op_type: OpType) -> Self {
        Self {
            op_type,
            children: Vec::new(),
        }
    }

    /// A pattern node with the given children
    pub fn with_children(op_type: OpType, children: Vec<Pattern>) -> Self {
        Self { op_type, children }
    }

    /// The wildcard pattern
    pub fn leaf() -> Self {
        Self::new(OpType::Leaf)
    }

    /// The operator kind this node matches
    pub fn op_type(&self) -> OpType {
        self.op_type
    }

    /// Child patterns in order
    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    /// Whether this node is the wildcard
    pub fn is_leaf(&self) -> bool {
        self.op_type == OpType::Leaf
    }
}
