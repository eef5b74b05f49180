// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use data_utils::data::DataFrameExt;
use datafusion::arrow::array;
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::arrow::util::pretty;
use datafusion::common::Column;
use datafusion::prelude::*;
use indoc::indoc;
use pretty_assertions::assert_eq;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn make_input(ctx: &SessionContext) -> DataFrameExt {
    let schema = Arc::new(Schema::new(vec![
        Field::new("firstName", DataType::Utf8, true),
        Field::new("userId", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(array::StringArray::from(vec!["Lily", "Lily", "Kevin"])),
            Arc::new(array::StringArray::from(vec!["15", "15", "8"])),
            Arc::new(array::StringArray::from(vec!["paid", "paid", "free"])),
        ],
    )
    .unwrap();

    ctx.read_batch(batch).unwrap().into()
}

async fn format(df: DataFrameExt) -> String {
    let batches = df.collect().await.unwrap();
    pretty::pretty_format_batches(&batches).unwrap().to_string()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_rename_columns_skips_missing() {
    let ctx = SessionContext::new();

    let df = make_input(&ctx)
        .rename_columns(&[
            ("firstName", "first_name"),
            ("songId", "song_id"),
            ("userId", "user_id"),
        ])
        .unwrap();

    assert!(df.has_column("first_name"));
    assert!(df.has_column("user_id"));
    assert!(!df.has_column("song_id"));
    assert!(!df.has_column("firstName"));
}

#[test_log::test(tokio::test)]
async fn test_rename_columns_is_case_sensitive() {
    let ctx = SessionContext::new();

    let df = make_input(&ctx)
        .rename_columns(&[("userId", "user_id"), ("firstname", "first_name")])
        .unwrap();

    assert_eq!(
        format(df).await,
        indoc!(
            "
            +-----------+---------+-------+
            | firstName | user_id | level |
            +-----------+---------+-------+
            | Lily      | 15      | paid  |
            | Lily      | 15      | paid  |
            | Kevin     | 8       | free  |
            +-----------+---------+-------+"
        )
    );
}

#[test_log::test(tokio::test)]
async fn test_rename_columns_without_matches() {
    let ctx = SessionContext::new();

    let df = make_input(&ctx)
        .rename_columns(&[("songId", "song_id")])
        .unwrap();

    let names: Vec<_> = df.schema().fields().iter().map(|f| f.name().clone()).collect();
    assert_eq!(names, ["firstName", "userId", "level"]);
}

#[test_log::test(tokio::test)]
async fn test_without_columns() {
    let ctx = SessionContext::new();

    let df = make_input(&ctx)
        .without_columns(&["level"])
        .unwrap()
        .distinct()
        .unwrap()
        .into_inner()
        .sort(vec![col(Column::from_name("userId")).sort(true, true)])
        .unwrap()
        .into();

    assert_eq!(
        format(df).await,
        indoc!(
            "
            +-----------+--------+
            | firstName | userId |
            +-----------+--------+
            | Lily      | 15     |
            | Kevin     | 8      |
            +-----------+--------+"
        )
    );
}

#[test_log::test(tokio::test)]
async fn test_num_rows_written_sums_counts() {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "count",
        DataType::UInt64,
        false,
    )]));

    let batches = vec![
        RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(array::UInt64Array::from(vec![3]))],
        )
        .unwrap(),
        RecordBatch::try_new(schema, vec![Arc::new(array::UInt64Array::from(vec![4]))]).unwrap(),
    ];

    assert_eq!(DataFrameExt::num_rows_written(&batches).unwrap(), 7);
    assert_eq!(DataFrameExt::num_rows_written(&[]).unwrap(), 0);
}

#[test_log::test(tokio::test)]
async fn test_num_rows_written_rejects_unexpected_schema() {
    let schema = Arc::new(Schema::new(vec![Field::new("rows", DataType::Int64, false)]));
    let batch =
        RecordBatch::try_new(schema, vec![Arc::new(array::Int64Array::from(vec![3]))]).unwrap();

    assert!(DataFrameExt::num_rows_written(&[batch]).is_err());
}
