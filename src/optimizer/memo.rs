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

//! Memoized plan forest
//!
//! The memo owns the groups and the rule set. Binding iterators drive
//! exploration lazily: rule firings append equivalent operators to a
//! group while iteration over that same group is in flight, so groups sit
//! behind `RefCell` and every access re-reads current state. The interior
//! mutability makes the memo deliberately not `Sync`: binding a group
//! from two threads at once is a bug the type system now rejects.

use std::cell::RefCell;

use crate::optimizer::group::Group;
use crate::optimizer::operator::{GroupId, Operator};
use crate::optimizer::rules::Rule;

/// The group forest plus the rules explored against it
pub struct Memo {
    groups: Vec<RefCell<Group>>,
    rules: Vec<Box<dyn Rule>>,
}

impl Memo {
    /// An empty memo with no rules
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// An empty memo with the given rule set
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self {
            groups: Vec::new(),
            rules,
        }
    }

    /// Append a group and return its id
    pub fn add_group(&mut self, operators: Vec<Operator>) -> GroupId {
        let id = self.groups.len();
        self.groups.push(RefCell::new(Group::new(id, operators)));
        id
    }

    /// Number of groups in the forest
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Current operator count of a group. Re-read on every enumeration
    /// step so rule-added operators are picked up.
    pub fn operator_count(&self, group: GroupId) -> usize {
        self.groups[group].borrow().operator_count()
    }

    /// Clone of the operator at `(group, index)`
    pub fn operator(&self, group: GroupId, index: usize) -> Operator {
        self.groups[group].borrow().operator(index).clone()
    }

    /// Clone of a group's full operator list
    pub fn operators(&self, group: GroupId) -> Vec<Operator> {
        self.groups[group].borrow().operators().to_vec()
    }

    /// Whether `(group, index)` has been explored
    pub fn is_explored(&self, group: GroupId, index: usize) -> bool {
        self.groups[group].borrow().is_explored(index)
    }

    /// Mark `(group, index)` explored; true when this call did the
    /// marking
    pub(crate) fn mark_explored(&self, group: GroupId, index: usize) -> bool {
        self.groups[group].borrow_mut().mark_explored(index)
    }

    /// Fire every rule against `(group, index)` and fold the produced
    /// operators back into the group. Identical operators are dropped.
    pub(crate) fn explore_item(&self, group: GroupId, index: usize) {
        for rule in &self.rules {
            let produced = rule.apply(self, group, index);
            if produced.is_empty() {
                continue;
            }
            let mut target = self.groups[group].borrow_mut();
            for operator in produced {
                target.add_operator(operator);
            }
        }
    }
}

impl Default for Memo {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("group_count", &self.groups.len())
            .field("rule_count", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_read_groups() {
        let mut memo = Memo::new();
        let g0 = memo.add_group(vec![Operator::Get {
            table: "a".to_string(),
        }]);
        let g1 = memo.add_group(vec![Operator::Filter { child: g0 }]);

        assert_eq!(memo.group_count(), 2);
        assert_eq!(memo.operator_count(g1), 1);
        assert_eq!(memo.operator(g1, 0), Operator::Filter { child: g0 });
    }
}
