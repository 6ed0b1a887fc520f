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

//! Optimizer core: memoized plan forest and pattern binding
//!
//! - [`operator`] - the closed operator sum
//! - [`group`] - equivalence classes with explored flags
//! - [`memo`] - the group forest plus the rule set
//! - [`pattern`] - tree templates with a wildcard leaf
//! - [`plan_node`] - bound plan trees
//! - [`rules`] - rewrites fired during exploration
//! - [`binding`] - lazy enumeration of pattern matches

pub mod binding;
pub mod group;
pub mod memo;
pub mod operator;
pub mod pattern;
pub mod plan_node;
pub mod rules;

pub use binding::{GroupBindingIterator, ItemBindingIterator};
pub use group::Group;
pub use memo::Memo;
pub use operator::{GroupId, OpType, Operator};
pub use pattern::Pattern;
pub use plan_node::OpPlanNode;
pub use rules::{
    default_rules, GetToSeqScan, InnerJoinCommutativity, InnerJoinToHashJoin, Rule,
};
