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

//! Pattern binding over the memo forest
//!
//! Two cooperating iterators lazily enumerate every concrete subtree of
//! the forest that matches a pattern. The group-level iterator fires
//! exploration for every unexplored operator of its group on
//! construction, then walks the operator list, re-reading its length on
//! each advance so operators added by rule firings are themselves
//! enumerated. The item-level iterator eagerly drains child bindings and
//! steps through their cartesian product in lexicographic order, last
//! child varying fastest.
//!
//! Enumeration cannot fail; a pattern that matches nothing simply yields
//! an empty enumeration.

use std::sync::Arc;

use crate::optimizer::memo::Memo;
use crate::optimizer::operator::{GroupId, Operator};
use crate::optimizer::pattern::Pattern;
use crate::optimizer::plan_node::OpPlanNode;

/// Enumerates every binding of a pattern rooted in one group.
///
/// Construction explores the group: every operator not yet explored is
/// marked and has the full rule set fired against it, which may grow the
/// group while this very iterator walks it. Operators added after the
/// group's first visit by a later firing elsewhere are not re-scanned by
/// this instance.
pub struct GroupBindingIterator<'a> {
    memo: &'a Memo,
    group_id: GroupId,
    pattern: &'a Pattern,
    current_item_index: usize,
    leaf_emitted: bool,
    current_iterator: Option<Box<ItemBindingIterator>>,
    peeked: Option<Arc<OpPlanNode>>,
}

impl<'a> GroupBindingIterator<'a> {
    /// Create an iterator over bindings of `pattern` rooted in `group_id`
    pub fn new(memo: &'a Memo, group_id: GroupId, pattern: &'a Pattern) -> Self {
        // Rules don't expose the structure of what they produce, so be
        // conservative and fire all of them. The count is re-read every
        // pass: operators appended mid-loop get explored too.
        let mut index = 0;
        while index < memo.operator_count(group_id) {
            if memo.mark_explored(group_id, index) {
                memo.explore_item(group_id, index);
            }
            index += 1;
        }

        Self {
            memo,
            group_id,
            pattern,
            current_item_index: 0,
            leaf_emitted: false,
            current_iterator: None,
            peeked: None,
        }
    }

    /// Whether another binding is available
    pub fn has_next(&mut self) -> bool {
        if self.peeked.is_none() {
            self.peeked = self.advance();
        }
        self.peeked.is_some()
    }

    /// The next binding, `None` at end of enumeration
    pub fn next_binding(&mut self) -> Option<Arc<OpPlanNode>> {
        match self.peeked.take() {
            Some(binding) => Some(binding),
            None => self.advance(),
        }
    }

    fn advance(&mut self) -> Option<Arc<OpPlanNode>> {
        // the wildcard binds the whole group exactly once
        if self.pattern.is_leaf() {
            if self.leaf_emitted {
                return None;
            }
            self.leaf_emitted = true;
            return Some(Arc::new(OpPlanNode::leaf(self.group_id)));
        }

        loop {
            if let Some(iterator) = self.current_iterator.as_mut() {
                if let Some(binding) = iterator.next() {
                    return Some(binding);
                }
                self.current_iterator = None;
                self.current_item_index += 1;
            }

            if self.current_item_index >= self.memo.operator_count(self.group_id) {
                return None;
            }
            self.current_iterator = Some(Box::new(ItemBindingIterator::new(
                self.memo,
                self.group_id,
                self.current_item_index,
                self.pattern,
            )));
        }
    }
}

impl Iterator for GroupBindingIterator<'_> {
    type Item = Arc<OpPlanNode>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_binding()
    }
}

/// Enumerates the bindings of a pattern against one operator of a group.
///
/// Child bindings are drained eagerly into per-child vectors; the
/// iterator then steps through their cartesian product. If the operator
/// kind or arity does not match the pattern, or any child has no
/// bindings, the iterator is empty from the start.
pub struct ItemBindingIterator {
    op: Operator,
    children_bindings: Vec<Vec<Arc<OpPlanNode>>>,
    positions: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl ItemBindingIterator {
    /// Bind `pattern` against the operator at `(group_id, item_index)`
    pub fn new(memo: &Memo, group_id: GroupId, item_index: usize, pattern: &Pattern) -> Self {
        let op = memo.operator(group_id, item_index);

        if op.op_type() != pattern.op_type() {
            return Self::empty(op);
        }

        let child_groups = op.children();
        let child_patterns = pattern.children();
        if child_groups.len() != child_patterns.len() {
            return Self::empty(op);
        }

        let mut children_bindings = Vec::with_capacity(child_groups.len());
        for (&child_group, child_pattern) in child_groups.iter().zip(child_patterns) {
            let bindings: Vec<Arc<OpPlanNode>> =
                GroupBindingIterator::new(memo, child_group, child_pattern).collect();
            if bindings.is_empty() {
                return Self::empty(op);
            }
            children_bindings.push(bindings);
        }

        Self {
            op,
            positions: vec![0; children_bindings.len()],
            children_bindings,
            started: false,
            exhausted: false,
        }
    }

    fn empty(op: Operator) -> Self {
        Self {
            op,
            children_bindings: Vec::new(),
            positions: Vec::new(),
            started: false,
            exhausted: true,
        }
    }

    fn materialize(&self) -> Arc<OpPlanNode> {
        let children = self
            .positions
            .iter()
            .enumerate()
            .map(|(child, &position)| Arc::clone(&self.children_bindings[child][position]))
            .collect();
        Arc::new(OpPlanNode::new(self.op.clone(), children))
    }
}

impl Iterator for ItemBindingIterator {
    type Item = Arc<OpPlanNode>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.materialize());
        }

        // odometer over the child positions, last child fastest
        let size = self.positions.len();
        let mut rolled = 0;
        while rolled < size {
            let child = size - 1 - rolled;
            self.positions[child] += 1;
            if self.positions[child] < self.children_bindings[child].len() {
                break;
            }
            self.positions[child] = 0;
            rolled += 1;
        }
        if rolled == size {
            // every combination of child bindings has been emitted
            self.exhausted = true;
            return None;
        }
        Some(self.materialize())
    }
}
