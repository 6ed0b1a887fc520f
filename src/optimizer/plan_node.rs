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

//! Bound plan trees
//!
//! A binding is a concrete operator tree cut out of the memo forest.
//! Nodes are immutable and shared: the binding engine reuses child
//! subtrees across the combinations it enumerates.

use std::sync::Arc;

use crate::optimizer::operator::{GroupId, Operator};

/// One node of a bound plan tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpPlanNode {
    op: Operator,
    children: Vec<Arc<OpPlanNode>>,
}

impl OpPlanNode {
    /// A node with the given operator and children
    pub fn new(op: Operator, children: Vec<Arc<OpPlanNode>>) -> Self {
        Self { op, children }
    }

    /// A leaf node standing in for an entire group
    pub fn leaf(group: GroupId) -> Self {
        Self {
            op: Operator::Leaf { group },
            children: Vec::new(),
        }
    }

    /// The operator at this node
    pub fn op(&self) -> &Operator {
        &self.op
    }

    /// Child subtrees in order
    pub fn children(&self) -> &[Arc<OpPlanNode>] {
        &self.children
    }
}
