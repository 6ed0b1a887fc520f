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

//! Tests for the DataTable insertion path and online layout
//! transformation

use std::sync::Arc;

use tessera::core::{DataType, Error, Row, Schema, SchemaColumn, Value};
use tessera::storage::{
    Catalog, CommittedVisibility, DataTable, HashIndex, Index, TableLayoutPolicy,
};
use tessera::IndexConstraintType;

fn int_schema() -> Schema {
    Schema::new(vec![
        SchemaColumn::simple(0, "a", DataType::Integer),
        SchemaColumn::simple(1, "b", DataType::Integer),
        SchemaColumn::simple(2, "c", DataType::Integer),
    ])
}

fn make_table(catalog: &Arc<Catalog>, tuples_per_tile_group: usize, schema: Schema) -> DataTable {
    DataTable::new(
        Arc::clone(catalog),
        Arc::new(CommittedVisibility),
        1,
        1,
        "t",
        schema,
        tuples_per_tile_group,
        TableLayoutPolicy::default(),
    )
    .expect("failed to create table")
}

fn int_row(a: i64, b: i64, c: i64) -> Row {
    Row::from(vec![Value::from(a), Value::from(b), Value::from(c)])
}

#[test]
fn test_insert_and_read_back() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    let location = table.insert_row(&int_row(1, 2, 3)).expect("insert failed");
    let group = table
        .tile_group_by_id(location.tile_group_id)
        .expect("group not in catalog");

    assert_eq!(group.get_value(location.offset, 0), Value::from(1));
    assert_eq!(group.get_value(location.offset, 1), Value::from(2));
    assert_eq!(group.get_value(location.offset, 2), Value::from(3));
    assert_eq!(table.row_count(), 1);
}

#[test]
fn test_full_group_triggers_single_append() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 4, int_schema());

    for i in 0..5 {
        table.insert_row(&int_row(i, i, i)).expect("insert failed");
    }

    assert_eq!(table.tile_group_count(), 2);
    let last = table.tile_group(1).expect("missing second group");
    assert_eq!(last.active_tuple_count(), 1);
    assert_eq!(table.row_count(), 5);
}

#[test]
fn test_not_null_violation_leaves_counters_untouched() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    let bad = Row::from(vec![
        Value::null(DataType::Integer),
        Value::from(2),
        Value::from(3),
    ]);
    let err = table.insert_row(&bad).unwrap_err();
    assert_eq!(
        err,
        Error::NotNullConstraint {
            column: "a".to_string()
        }
    );

    assert_eq!(table.row_count(), 0);
    assert_eq!(table.number_of_rows(), 0.0);
    assert_eq!(table.tile_group_count(), 1);
}

#[test]
fn test_row_arity_mismatch_rejected() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    let short = Row::from(vec![Value::from(1)]);
    assert!(matches!(
        table.insert_row(&short),
        Err(Error::RowColumnsNotMatch {
            expected: 3,
            got: 1
        })
    ));
}

#[test]
fn test_transform_tile_group_preserves_rows() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    for i in 0..8 {
        table
            .insert_row(&int_row(i, i * 10, i * 100))
            .expect("insert failed");
    }

    // move column c into its own tile
    table
        .set_default_partition(vec![(0, 0), (0, 1), (1, 0)])
        .expect("bad partition");
    let new_group = table
        .transform_tile_group(0, 0.0)
        .expect("transform errored")
        .expect("transform skipped");

    assert_eq!(new_group.tile_count(), 2);
    assert_eq!(new_group.locate(2), (1, 0));
    assert_eq!(new_group.active_tuple_count(), 8);

    // row 3 reads back unchanged through the catalog
    let group = table.tile_group(0).expect("missing group");
    assert_eq!(group.get_value(3, 0), Value::from(3));
    assert_eq!(group.get_value(3, 1), Value::from(30));
    assert_eq!(group.get_value(3, 2), Value::from(300));
}

#[test]
fn test_transform_is_idempotent_under_threshold() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());
    table.insert_row(&int_row(1, 2, 3)).expect("insert failed");

    table
        .set_default_partition(vec![(0, 0), (1, 0), (1, 1)])
        .expect("bad partition");
    assert!(table
        .transform_tile_group(0, 0.0)
        .expect("transform errored")
        .is_some());

    // second call under a positive threshold observes zero difference
    assert!(table
        .transform_tile_group(0, 0.1)
        .expect("transform errored")
        .is_none());
}

#[test]
fn test_transform_rejects_bad_offset() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    assert!(matches!(
        table.transform_tile_group(5, 0.0),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_insert_visible_across_transform() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    let location = table.insert_row(&int_row(7, 8, 9)).expect("insert failed");
    table
        .set_default_partition(vec![(0, 0), (1, 0), (2, 0)])
        .expect("bad partition");
    table
        .transform_tile_group(0, 0.0)
        .expect("transform errored")
        .expect("transform skipped");

    // further inserts land in the transformed group
    let location2 = table.insert_row(&int_row(10, 11, 12)).expect("insert failed");
    assert_eq!(location2.tile_group_id, location.tile_group_id);

    let group = table
        .tile_group_by_id(location.tile_group_id)
        .expect("group not in catalog");
    assert_eq!(group.get_value(location.offset, 1), Value::from(8));
    assert_eq!(group.get_value(location2.offset, 2), Value::from(12));
}

#[test]
fn test_index_fanout_on_insert() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    let primary = Arc::new(HashIndex::new(
        10,
        "pk_a",
        IndexConstraintType::PrimaryKey,
        table.schema(),
        vec![0],
    ));
    let secondary = Arc::new(HashIndex::new(
        11,
        "ix_b",
        IndexConstraintType::Default,
        table.schema(),
        vec![1],
    ));
    table.add_index(primary.clone());
    table.add_index(secondary.clone());
    assert!(table.has_primary_key());
    assert_eq!(table.index_count(), 2);

    let location = table.insert_row(&int_row(1, 2, 3)).expect("insert failed");

    let by_pk = primary.scan_key(&Row::from(vec![Value::from(1)]));
    assert_eq!(by_pk, vec![location]);
    let by_b = secondary.scan_key(&Row::from(vec![Value::from(2)]));
    assert_eq!(by_b, vec![location]);
    assert_eq!(primary.number_of_tuples(), 1);
}

#[test]
fn test_insert_version_skips_primary_index() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    let primary = Arc::new(HashIndex::new(
        10,
        "pk_a",
        IndexConstraintType::PrimaryKey,
        table.schema(),
        vec![0],
    ));
    let secondary = Arc::new(HashIndex::new(
        11,
        "ix_b",
        IndexConstraintType::Default,
        table.schema(),
        vec![1],
    ));
    table.add_index(primary.clone());
    table.add_index(secondary.clone());

    let location = table
        .insert_version(&int_row(1, 2, 3))
        .expect("insert failed");

    assert!(primary.scan_key(&Row::from(vec![Value::from(1)])).is_empty());
    assert_eq!(
        secondary.scan_key(&Row::from(vec![Value::from(2)])),
        vec![location]
    );
}

#[test]
fn test_empty_version_skips_constraint_checks() {
    let catalog = Arc::new(Catalog::new());
    let table = make_table(&catalog, 8, int_schema());

    let with_null = Row::from(vec![
        Value::null(DataType::Integer),
        Value::from(2),
        Value::from(3),
    ]);
    // the same row is rejected by the regular path
    assert!(table.insert_row(&with_null).is_err());
    assert!(table.insert_empty_version(&with_null).is_ok());
    assert_eq!(table.row_count(), 1);
}

#[test]
fn test_dropping_table_unregisters_tile_groups() {
    let catalog = Arc::new(Catalog::new());
    {
        let table = make_table(&catalog, 4, int_schema());
        for i in 0..9 {
            table.insert_row(&int_row(i, i, i)).expect("insert failed");
        }
        assert_eq!(catalog.tile_group_count(), 3);
    }
    assert_eq!(catalog.tile_group_count(), 0);
}
