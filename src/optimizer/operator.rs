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

//! Plan operators
//!
//! Operators form a closed sum: child group extraction is one `match`,
//! not an open visitor hierarchy. Children come out in a stable order,
//! for joins outer first then inner.

use smallvec::SmallVec;

/// Identifier of a group in the memo forest
pub type GroupId = usize;

/// Operator kind, used for pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpType {
    Get,
    Project,
    Filter,
    InnerJoin,
    LeftJoin,
    RightJoin,
    OuterJoin,
    Aggregate,
    Limit,
    SeqScan,
    HashJoin,
    /// Wildcard matching any subtree
    Leaf,
}

/// A logical or physical plan operator whose inputs are memo groups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Logical relation access
    Get { table: String },
    /// Projection over a child group
    Project { child: GroupId },
    /// Selection over a child group
    Filter { child: GroupId },
    /// Inner join of two groups
    InnerJoin { outer: GroupId, inner: GroupId },
    /// Left outer join
    LeftJoin { outer: GroupId, inner: GroupId },
    /// Right outer join
    RightJoin { outer: GroupId, inner: GroupId },
    /// Full outer join
    OuterJoin { outer: GroupId, inner: GroupId },
    /// Aggregation over a child group
    Aggregate { child: GroupId },
    /// Row limit over a child group
    Limit { child: GroupId },
    /// Physical sequential scan
    SeqScan { table: String },
    /// Physical hash join
    HashJoin { outer: GroupId, inner: GroupId },
    /// Stand-in for an entire group in a binding
    Leaf { group: GroupId },
}

impl Operator {
    /// The operator kind
    pub fn op_type(&self) -> OpType {
        match self {
            Operator::Get { .. } => OpType::Get,
            Operator::Project { .. } => OpType::Project,
            Operator::Filter { .. } => OpType::Filter,
            Operator::InnerJoin { .. } => OpType::InnerJoin,
            Operator::LeftJoin { .. } => OpType::LeftJoin,
            Operator::RightJoin { .. } => OpType::RightJoin,
            Operator::OuterJoin { .. } => OpType::OuterJoin,
            Operator::Aggregate { .. } => OpType::Aggregate,
            Operator::Limit { .. } => OpType::Limit,
            Operator::SeqScan { .. } => OpType::SeqScan,
            Operator::HashJoin { .. } => OpType::HashJoin,
            Operator::Leaf { .. } => OpType::Leaf,
        }
    }

    /// Child group ids in stable order
    pub fn children(&self) -> SmallVec<[GroupId; 2]> {
        match self {
            Operator::Get { .. } | Operator::SeqScan { .. } | Operator::Leaf { .. } => {
                SmallVec::new()
            }
            Operator::Project { child }
            | Operator::Filter { child }
            | Operator::Aggregate { child }
            | Operator::Limit { child } => SmallVec::from_slice(&[*child]),
            Operator::InnerJoin { outer, inner }
            | Operator::LeftJoin { outer, inner }
            | Operator::RightJoin { outer, inner }
            | Operator::OuterJoin { outer, inner }
            | Operator::HashJoin { outer, inner } => SmallVec::from_slice(&[*outer, *inner]),
        }
    }
}
