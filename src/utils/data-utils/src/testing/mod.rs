// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use datafusion::arrow::array::RecordBatch;
use datafusion::arrow::util::pretty;
use datafusion::common::{Column, DFSchema};
use datafusion::prelude::col;
use pretty_assertions::assert_eq;

use crate::data::DataFrameExt;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Compares data against a pretty-printed table, row order matters
pub async fn assert_data_eq(df: DataFrameExt, expected: &str) {
    let batches = df.collect().await.unwrap();
    let actual = format_batches(&batches);
    assert_eq!(expected.trim(), actual.trim());
}

/// Same as [`assert_data_eq`] but sorts the rows by all columns first
pub async fn assert_data_eq_unordered(df: DataFrameExt, expected: &str) {
    assert_data_eq(sort_by_all_columns(df), expected).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// Checks for equivalence ignoring the order of rows
pub async fn assert_dfs_equivalent(lhs: DataFrameExt, rhs: DataFrameExt) {
    assert_eq!(format_schema(lhs.schema()), format_schema(rhs.schema()));

    let lhs_batches = sort_by_all_columns(lhs).collect().await.unwrap();
    let rhs_batches = sort_by_all_columns(rhs).collect().await.unwrap();

    let lhs_count: usize = lhs_batches.iter().map(RecordBatch::num_rows).sum();
    let rhs_count: usize = rhs_batches.iter().map(RecordBatch::num_rows).sum();

    // This is a workaround for the situation where collect returns an empty vec vs.
    // a vec containing an empty batch
    if lhs_count == 0 && rhs_count == 0 {
        return;
    }

    assert_eq!(format_batches(&lhs_batches), format_batches(&rhs_batches));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Compares schema against lines of `name: Type` entries, nullable fields are
/// marked with a trailing `?`
pub fn assert_schema_eq(schema: &DFSchema, expected: &str) {
    let expected: Vec<_> = expected
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let actual = format_schema(schema);
    let actual: Vec<_> = actual.lines().collect();

    assert_eq!(expected, actual);
}

pub fn format_schema(schema: &DFSchema) -> String {
    schema
        .fields()
        .iter()
        .map(|f| {
            format!(
                "{}: {:?}{}",
                f.name(),
                f.data_type(),
                if f.is_nullable() { "?" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn num_rows(df: DataFrameExt) -> usize {
    df.into_inner().count().await.unwrap()
}

fn sort_by_all_columns(df: DataFrameExt) -> DataFrameExt {
    let sort_exprs = df
        .schema()
        .fields()
        .iter()
        .map(|f| col(Column::from_name(f.name())).sort(true, true))
        .collect();

    df.into_inner().sort(sort_exprs).unwrap().into()
}

fn format_batches(batches: &[RecordBatch]) -> String {
    pretty::pretty_format_batches(batches).unwrap().to_string()
}
