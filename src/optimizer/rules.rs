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

//! Rewrite rules
//!
//! A rule inspects one operator of one group and may produce equivalent
//! operators for the same group. Rules do not expose the shape of their
//! output, so exploration conservatively fires every rule against every
//! operator the first time a group is visited.

use crate::optimizer::memo::Memo;
use crate::optimizer::operator::{GroupId, Operator};

/// A rewrite producing operators equivalent to `(group, index)`
pub trait Rule {
    /// Rule name for diagnostics
    fn name(&self) -> &'static str;

    /// Operators to add to the group, possibly none
    fn apply(&self, memo: &Memo, group: GroupId, index: usize) -> Vec<Operator>;
}

/// `InnerJoin(a, b)` is equivalent to `InnerJoin(b, a)`
pub struct InnerJoinCommutativity;

impl Rule for InnerJoinCommutativity {
    fn name(&self) -> &'static str {
        "inner_join_commutativity"
    }

    fn apply(&self, memo: &Memo, group: GroupId, index: usize) -> Vec<Operator> {
        match memo.operator(group, index) {
            Operator::InnerJoin { outer, inner } => vec![Operator::InnerJoin {
                outer: inner,
                inner: outer,
            }],
            _ => Vec::new(),
        }
    }
}

/// Implement a logical `Get` as a sequential scan
pub struct GetToSeqScan;

impl Rule for GetToSeqScan {
    fn name(&self) -> &'static str {
        "get_to_seq_scan"
    }

    fn apply(&self, memo: &Memo, group: GroupId, index: usize) -> Vec<Operator> {
        match memo.operator(group, index) {
            Operator::Get { table } => vec![Operator::SeqScan { table }],
            _ => Vec::new(),
        }
    }
}

/// Implement a logical inner join as a hash join
pub struct InnerJoinToHashJoin;

impl Rule for InnerJoinToHashJoin {
    fn name(&self) -> &'static str {
        "inner_join_to_hash_join"
    }

    fn apply(&self, memo: &Memo, group: GroupId, index: usize) -> Vec<Operator> {
        match memo.operator(group, index) {
            Operator::InnerJoin { outer, inner } => vec![Operator::HashJoin { outer, inner }],
            _ => Vec::new(),
        }
    }
}

/// The bundled rule set
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(InnerJoinCommutativity),
        Box::new(GetToSeqScan),
        Box::new(InnerJoinToHashJoin),
    ]
}
