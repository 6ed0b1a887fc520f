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

//! Tests for pattern binding over the memo forest

use std::collections::HashSet;
use std::sync::Arc;

use tessera::optimizer::{
    default_rules, GroupBindingIterator, Memo, OpPlanNode, OpType, Operator, Pattern,
};

fn get(table: &str) -> Operator {
    Operator::Get {
        table: table.to_string(),
    }
}

fn join_of_leaves() -> Pattern {
    Pattern::with_children(OpType::InnerJoin, vec![Pattern::leaf(), Pattern::leaf()])
}

/// Render a bound tree into a comparable string
fn render(node: &OpPlanNode) -> String {
    let children: Vec<String> = node.children().iter().map(|c| render(c)).collect();
    if children.is_empty() {
        format!("{:?}", node.op())
    } else {
        format!("{:?}({})", node.op(), children.join(", "))
    }
}

#[test]
fn test_join_of_leaves_binds_exactly_once() {
    let mut memo = Memo::new();
    let g1 = memo.add_group(vec![get("A")]);
    let g2 = memo.add_group(vec![get("B")]);
    let g0 = memo.add_group(vec![Operator::InnerJoin {
        outer: g1,
        inner: g2,
    }]);

    let pattern = join_of_leaves();
    let mut iterator = GroupBindingIterator::new(&memo, g0, &pattern);

    assert!(iterator.has_next());
    let tree = iterator.next_binding().expect("binding missing");
    assert_eq!(tree.op(), &Operator::InnerJoin { outer: g1, inner: g2 });
    assert_eq!(tree.children()[0].op(), &Operator::Leaf { group: g1 });
    assert_eq!(tree.children()[1].op(), &Operator::Leaf { group: g2 });

    assert!(!iterator.has_next());
    assert!(iterator.next_binding().is_none());
}

#[test]
fn test_leaf_binding_collapses_alternatives() {
    let mut memo = Memo::new();
    let g1 = memo.add_group(vec![get("A")]);
    let g2 = memo.add_group(vec![get("B"), get("C")]);
    let g0 = memo.add_group(vec![Operator::InnerJoin {
        outer: g1,
        inner: g2,
    }]);

    // a leaf child stands in for the whole group, so alternatives in g2
    // do not fan out
    let leaf_pattern = join_of_leaves();
    let bindings: Vec<_> = GroupBindingIterator::new(&memo, g0, &leaf_pattern).collect();
    assert_eq!(bindings.len(), 1);

    // matching concrete operator types fans out per alternative
    let typed_pattern = Pattern::with_children(
        OpType::InnerJoin,
        vec![Pattern::new(OpType::Get), Pattern::new(OpType::Get)],
    );
    let bindings: Vec<_> = GroupBindingIterator::new(&memo, g0, &typed_pattern).collect();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].children()[1].op(), &get("B"));
    assert_eq!(bindings[1].children()[1].op(), &get("C"));
}

#[test]
fn test_binding_count_is_product_of_child_counts() {
    let mut memo = Memo::new();
    let g1 = memo.add_group(vec![get("A"), get("B")]);
    let g2 = memo.add_group(vec![get("C"), get("D"), get("E")]);
    let g0 = memo.add_group(vec![Operator::InnerJoin {
        outer: g1,
        inner: g2,
    }]);

    let pattern = Pattern::with_children(
        OpType::InnerJoin,
        vec![Pattern::new(OpType::Get), Pattern::new(OpType::Get)],
    );
    let bindings: Vec<Arc<OpPlanNode>> =
        GroupBindingIterator::new(&memo, g0, &pattern).collect();
    assert_eq!(bindings.len(), 2 * 3);

    let rendered: HashSet<String> = bindings.iter().map(|b| render(b)).collect();
    assert_eq!(rendered.len(), bindings.len(), "bindings must be distinct");
}

#[test]
fn test_leaf_pattern_on_root_group() {
    let mut memo = Memo::new();
    let g0 = memo.add_group(vec![get("A"), get("B"), get("C")]);

    let pattern = Pattern::leaf();
    let bindings: Vec<_> = GroupBindingIterator::new(&memo, g0, &pattern).collect();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].op(), &Operator::Leaf { group: g0 });
}

#[test]
fn test_arity_mismatch_yields_empty_enumeration() {
    let mut memo = Memo::new();
    let g1 = memo.add_group(vec![get("A")]);
    let g0 = memo.add_group(vec![Operator::Filter { child: g1 }]);

    // filter has one child, the pattern wants two
    let pattern = Pattern::with_children(
        OpType::Filter,
        vec![Pattern::leaf(), Pattern::leaf()],
    );
    let mut iterator = GroupBindingIterator::new(&memo, g0, &pattern);
    assert!(!iterator.has_next());
}

#[test]
fn test_exploration_adds_implementations() {
    let mut memo = Memo::with_rules(default_rules());
    let g0 = memo.add_group(vec![get("A")]);

    // before any visit the group only holds the logical operator
    assert_eq!(memo.operator_count(g0), 1);

    let pattern = Pattern::new(OpType::SeqScan);
    let bindings: Vec<_> = GroupBindingIterator::new(&memo, g0, &pattern).collect();
    assert_eq!(bindings.len(), 1);
    assert_eq!(
        bindings[0].op(),
        &Operator::SeqScan {
            table: "A".to_string()
        }
    );
    assert!(memo.is_explored(g0, 0));
}

#[test]
fn test_exploration_fans_out_commuted_joins() {
    let mut memo = Memo::with_rules(default_rules());
    let g1 = memo.add_group(vec![get("A")]);
    let g2 = memo.add_group(vec![get("B")]);
    let g0 = memo.add_group(vec![Operator::InnerJoin {
        outer: g1,
        inner: g2,
    }]);

    let pattern = join_of_leaves();
    let bindings: Vec<_> = GroupBindingIterator::new(&memo, g0, &pattern).collect();

    // commutativity added the swapped join; both match the pattern and
    // the swapped operator was itself explored in the same pass
    assert_eq!(bindings.len(), 2);
    let roots: HashSet<String> = bindings.iter().map(|b| format!("{:?}", b.op())).collect();
    assert!(roots.contains(&format!(
        "{:?}",
        Operator::InnerJoin { outer: g1, inner: g2 }
    )));
    assert!(roots.contains(&format!(
        "{:?}",
        Operator::InnerJoin { outer: g2, inner: g1 }
    )));

    // the hash join implementation landed in the group as well
    let operators = memo.operators(g0);
    assert!(operators.contains(&Operator::HashJoin { outer: g1, inner: g2 }));
}

#[test]
fn test_second_visit_does_not_refire_rules() {
    let mut memo = Memo::with_rules(default_rules());
    let g0 = memo.add_group(vec![get("A")]);

    let pattern = Pattern::new(OpType::Get);
    let first: Vec<_> = GroupBindingIterator::new(&memo, g0, &pattern).collect();
    let count_after_first = memo.operator_count(g0);

    let second: Vec<_> = GroupBindingIterator::new(&memo, g0, &pattern).collect();
    assert_eq!(first.len(), second.len());
    assert_eq!(memo.operator_count(g0), count_after_first);
}

#[test]
fn test_nested_pattern_binds_through_groups() {
    let mut memo = Memo::new();
    let g3 = memo.add_group(vec![get("C")]);
    let g1 = memo.add_group(vec![get("A")]);
    let g2 = memo.add_group(vec![Operator::Filter { child: g3 }]);
    let g0 = memo.add_group(vec![Operator::InnerJoin {
        outer: g1,
        inner: g2,
    }]);

    let pattern = Pattern::with_children(
        OpType::InnerJoin,
        vec![
            Pattern::new(OpType::Get),
            Pattern::with_children(OpType::Filter, vec![Pattern::leaf()]),
        ],
    );
    let bindings: Vec<_> = GroupBindingIterator::new(&memo, g0, &pattern).collect();
    assert_eq!(bindings.len(), 1);

    let tree = &bindings[0];
    assert_eq!(tree.children()[0].op(), &get("A"));
    assert_eq!(tree.children()[1].op(), &Operator::Filter { child: g3 });
    assert_eq!(
        tree.children()[1].children()[0].op(),
        &Operator::Leaf { group: g3 }
    );
}
