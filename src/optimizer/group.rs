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

//! Memo group - an equivalence class of operators
//!
//! A group holds an ordered operator list and one explored flag per
//! operator. The flag is monotone: once set, rules are never re-fired on
//! that operator.

use crate::optimizer::operator::{GroupId, Operator};

/// One equivalence class in the memo forest
#[derive(Debug)]
pub struct Group {
    id: GroupId,
    operators: Vec<Operator>,
    explored: Vec<bool>,
}

impl Group {
    /// Create a group with an initial operator list
    pub fn new(id: GroupId, operators: Vec<Operator>) -> Self {
        let explored = vec![false; operators.len()];
        Self {
            id,
            operators,
            explored,
        }
    }

    /// The group id
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Number of operators currently in the group
    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    /// The operator at the given index
    pub fn operator(&self, index: usize) -> &Operator {
        &self.operators[index]
    }

    /// All operators in order
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Whether the operator at the given index has been explored
    pub fn is_explored(&self, index: usize) -> bool {
        self.explored[index]
    }

    /// Mark an operator explored. Returns true when this call did the
    /// marking, false when it was already set.
    pub fn mark_explored(&mut self, index: usize) -> bool {
        if self.explored[index] {
            return false;
        }
        self.explored[index] = true;
        true
    }

    /// Append an equivalent operator unless an identical one is already
    /// present. New operators start unexplored.
    pub fn add_operator(&mut self, operator: Operator) -> bool {
        if self.operators.contains(&operator) {
            return false;
        }
        self.operators.push(operator);
        self.explored.push(false);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explored_flag_is_monotone() {
        let mut group = Group::new(
            0,
            vec![Operator::Get {
                table: "t".to_string(),
            }],
        );
        assert!(!group.is_explored(0));
        assert!(group.mark_explored(0));
        assert!(!group.mark_explored(0));
        assert!(group.is_explored(0));
    }

    #[test]
    fn test_duplicate_operators_rejected() {
        let mut group = Group::new(0, vec![Operator::InnerJoin { outer: 1, inner: 2 }]);
        assert!(!group.add_operator(Operator::InnerJoin { outer: 1, inner: 2 }));
        assert!(group.add_operator(Operator::InnerJoin { outer: 2, inner: 1 }));
        assert_eq!(group.operator_count(), 2);
        assert!(!group.is_explored(1));
    }
}
