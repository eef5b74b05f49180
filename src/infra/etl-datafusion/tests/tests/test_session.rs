// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use datafusion::execution::object_store::ObjectStoreUrl;
use playlog_etl_datafusion::*;

use crate::utils::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn test_credentials() -> S3Credentials {
    S3Credentials {
        access_key_id: "AKIATEST".to_string(),
        secret_access_key: "secret".to_string(),
        region: Some("us-west-2".to_string()),
        endpoint: Some("http://localhost:9000".to_string()),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_session_is_created_once() {
    let harness = TestHarness::new();
    let provider = harness.session_provider();

    let a = provider.session().await.unwrap();
    let b = provider.session().await.unwrap();

    assert_eq!(a.session_id(), b.session_id());
}

#[test_log::test(tokio::test)]
async fn test_session_uses_utc() {
    let harness = TestHarness::new();
    let ctx = harness.session().await;

    assert_eq!(
        ctx.copied_config().options().execution.time_zone.as_deref(),
        Some(SESSION_TIME_ZONE)
    );
    assert!(
        !ctx.copied_config()
            .options()
            .execution
            .listing_table_ignore_subdirectory
    );
}

#[test_log::test(tokio::test)]
async fn test_session_engine_options() {
    let harness = TestHarness::new();

    let mut config = harness.config();
    config.engine.target_partitions = Some(3);
    config.engine.batch_size = Some(1024);

    let ctx = EngineSessionProvider::new(config).session().await.unwrap();

    assert_eq!(ctx.copied_config().target_partitions(), 3);
    assert_eq!(ctx.copied_config().batch_size(), 1024);
}

#[test_log::test(tokio::test)]
async fn test_session_remote_output_requires_credentials() {
    let harness = TestHarness::new();

    let mut config = harness.config();
    config.output = StorageLocation::parse("s3a://my-bucket/warehouse").unwrap();

    let res = EngineSessionProvider::new(config).session().await;

    assert!(
        matches!(
            res,
            Err(SessionError::MissingCredentials(MissingCredentialsError { ref location }))
                if location == "s3://my-bucket/warehouse"
        ),
        "Unexpected result: {:?}",
        res.map(|ctx| ctx.session_id())
    );
}

#[test_log::test(tokio::test)]
async fn test_session_registers_s3_stores() {
    let harness = TestHarness::new();

    let mut config = harness.config();
    config.song_data = StorageLocation::parse("s3a://udacity-dend/song_data").unwrap();
    config.output = StorageLocation::parse("s3://my-bucket/warehouse").unwrap();
    let config = config.with_credentials(test_credentials());

    let ctx = EngineSessionProvider::new(config).session().await.unwrap();

    for url in ["s3://udacity-dend/", "s3://my-bucket/"] {
        let url = ObjectStoreUrl::parse(url).unwrap();
        assert!(
            ctx.runtime_env().object_store(&url).is_ok(),
            "Store not registered for {url:?}"
        );
    }

    let unknown = ObjectStoreUrl::parse("s3://other-bucket/").unwrap();
    assert!(ctx.runtime_env().object_store(&unknown).is_err());

    // Local inputs still resolve through the default store
    let local = ObjectStoreUrl::parse("file:///").unwrap();
    assert!(ctx.runtime_env().object_store(&local).is_ok());
}
