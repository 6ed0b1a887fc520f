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

//! Tests for optimizer row sampling and cardinality estimation

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tessera::core::{DataType, Row, Schema, SchemaColumn, Value};
use tessera::storage::{Catalog, CommittedVisibility, DataTable, TableLayoutPolicy};

/// Table with a distinct integer key, a low-cardinality integer and a
/// text column, populated with `row_count` rows
fn populated_table(catalog: &Arc<Catalog>, row_count: i64) -> DataTable {
    let schema = Schema::new(vec![
        SchemaColumn::simple(0, "k", DataType::Integer),
        SchemaColumn::simple(1, "v1", DataType::Integer),
        SchemaColumn::nullable(2, "v2", DataType::Text),
    ]);
    let table = DataTable::new(
        Arc::clone(catalog),
        Arc::new(CommittedVisibility),
        1,
        1,
        "samples",
        schema,
        256,
        TableLayoutPolicy::default(),
    )
    .expect("failed to create table");

    for i in 0..row_count {
        let row = Row::from(vec![
            Value::from(i),
            Value::from(i % 10),
            Value::from(format!("row-{}", i)),
        ]);
        table.insert_row(&row).expect("insert failed");
    }
    table
}

#[test]
fn test_sample_rows_distinct_and_bounded() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 1000);

    let mut rng = StdRng::seed_from_u64(42);
    let taken = table.sample_rows_with_rng(100, &mut rng);
    assert!(taken <= 100);
    assert!(taken > 0);
    assert_eq!(taken, table.optimizer_sample_size());

    let pointers = table.optimizer_sample();
    let distinct: HashSet<_> = pointers.iter().collect();
    assert_eq!(distinct.len(), pointers.len(), "sampled pointers must be distinct");
}

#[test]
fn test_oversized_sample_takes_whole_table() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 50);

    // deterministic path, no generator involved
    let taken = table.sample_rows(1000);
    assert_eq!(taken, 50);
}

#[test]
fn test_sample_of_empty_table_is_empty() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 0);
    assert_eq!(table.sample_rows(10), 0);
}

#[test]
fn test_materialize_and_cardinality() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 1000);

    let mut rng = StdRng::seed_from_u64(7);
    let taken = table.sample_rows_with_rng(100, &mut rng);
    table.materialize_sample().expect("materialize failed");

    // the key is unique, so the sample holds `taken` distinct keys
    assert_eq!(table.compute_table_cardinality(0), taken as u64);
    // v1 cycles through ten values
    assert!(table.compute_table_cardinality(1) <= 10);
    // text columns are never sampled
    assert_eq!(table.compute_table_cardinality(2), 0);

    assert_eq!(table.table_cardinality(0), taken as u64);
    assert_eq!(table.table_cardinality(2), 0);
}

#[test]
fn test_full_table_sample_exact_cardinality() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 200);

    assert_eq!(table.sample_rows(200), 200);
    table.materialize_sample().expect("materialize failed");

    assert_eq!(table.compute_table_cardinality(0), 200);
    assert_eq!(table.compute_table_cardinality(1), 10);
}

#[test]
fn test_sample_values_match_base_table() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 300);

    let mut rng = StdRng::seed_from_u64(3);
    let taken = table.sample_rows_with_rng(64, &mut rng);
    table.materialize_sample().expect("materialize failed");

    let sample_group = table.sample_tile_group().expect("sample group missing");
    assert_eq!(sample_group.active_tuple_count(), taken);

    let pointers = table.optimizer_sample();
    for (slot, pointer) in pointers.iter().enumerate() {
        let base_group = table
            .tile_group_by_id(pointer.tile_group_id)
            .expect("base group missing");
        // inlined columns k and v1 map to sample columns 0 and 1
        for column in 0..2 {
            assert_eq!(
                sample_group.get_value(slot, column),
                base_group.get_value(pointer.offset, column),
                "sample row {} column {} diverged",
                slot,
                column
            );
        }
    }
}

#[test]
fn test_resample_drops_prior_state() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 500);

    let mut rng = StdRng::seed_from_u64(11);
    table.sample_rows_with_rng(50, &mut rng);
    table.materialize_sample().expect("materialize failed");
    let first_group = table.sample_tile_group().expect("sample group missing");
    assert!(table.compute_table_cardinality(0) > 0);

    // resampling clears pointers, the sample tile group and the cache
    let taken = table.sample_rows_with_rng(80, &mut rng);
    assert_eq!(table.optimizer_sample_size(), taken);
    assert!(table.sample_tile_group().is_none());
    assert_eq!(table.table_cardinality(0), 0);
    assert!(
        catalog
            .get_tile_group(first_group.tile_group_id())
            .is_none(),
        "old sample group must be dropped from the catalog"
    );
}

#[test]
fn test_materialize_without_sample_is_noop() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 10);

    table.materialize_sample().expect("materialize failed");
    assert!(table.sample_tile_group().is_none());
    assert_eq!(table.table_cardinality(0), 0);
}

#[test]
fn test_rematerialize_replaces_sample_group() {
    let catalog = Arc::new(Catalog::new());
    let table = populated_table(&catalog, 100);

    table.sample_rows(100);
    table.materialize_sample().expect("materialize failed");
    let first = table.sample_tile_group().expect("sample group missing");

    table.materialize_sample().expect("materialize failed");
    let second = table.sample_tile_group().expect("sample group missing");

    assert_ne!(first.tile_group_id(), second.tile_group_id());
    assert!(catalog.get_tile_group(first.tile_group_id()).is_none());
    assert_eq!(second.active_tuple_count(), 100);
}
