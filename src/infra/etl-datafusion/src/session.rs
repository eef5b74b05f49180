// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeSet;
use std::sync::Arc;

use datafusion::execution::object_store::ObjectStoreUrl;
use datafusion::prelude::*;
use internal_error::*;
use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;
use playlog_core::*;
use tokio::sync::OnceCell;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// All derived time fields are computed in UTC regardless of the host zone
pub const SESSION_TIME_ZONE: &str = "+00:00";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Creates the engine session once per process and hands out clones of it.
///
/// Object stores for every remote location of the run are registered when
/// the session is created, so a failure to construct them aborts the run
/// before any data is touched.
pub struct EngineSessionProvider {
    config: PipelineConfig,
    session: OnceCell<SessionContext>,
}

impl EngineSessionProvider {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            session: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn session(&self) -> Result<SessionContext, SessionError> {
        let ctx = self
            .session
            .get_or_try_init(|| async { self.build_session() })
            .await?;

        Ok(ctx.clone())
    }

    #[tracing::instrument(level = "info", skip_all)]
    fn build_session(&self) -> Result<SessionContext, SessionError> {
        self.config.check_credentials()?;

        let mut session_config = SessionConfig::new()
            .set_str("datafusion.execution.time_zone", SESSION_TIME_ZONE)
            // Inputs are sharded into nested directories
            .set_bool(
                "datafusion.execution.listing_table_ignore_subdirectory",
                false,
            );

        if let Some(target_partitions) = self.config.engine.target_partitions {
            session_config = session_config.with_target_partitions(target_partitions);
        }
        if let Some(batch_size) = self.config.engine.batch_size {
            session_config = session_config.with_batch_size(batch_size);
        }

        let ctx = SessionContext::new_with_config(session_config);

        if let Some(credentials) = &self.config.credentials {
            let buckets: BTreeSet<_> = self
                .config
                .locations()
                .into_iter()
                .filter_map(StorageLocation::bucket)
                .collect();

            for bucket in buckets {
                let url = ObjectStoreUrl::parse(format!("s3://{bucket}")).int_err()?;
                let store = build_s3_store(bucket, credentials)?;

                tracing::info!(
                    %bucket,
                    region = ?credentials.region,
                    endpoint = ?credentials.endpoint,
                    "Registering S3 object store"
                );
                ctx.register_object_store(url.as_ref(), store);
            }
        }

        tracing::debug!(session_id = %ctx.session_id(), "Engine session created");

        Ok(ctx)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn build_s3_store(
    bucket: &str,
    credentials: &S3Credentials,
) -> Result<Arc<dyn ObjectStore>, InternalError> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(bucket)
        .with_access_key_id(&credentials.access_key_id)
        .with_secret_access_key(&credentials.secret_access_key);

    if let Some(region) = &credentials.region {
        builder = builder.with_region(region);
    }

    if let Some(endpoint) = &credentials.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_virtual_hosted_style_request(false)
            .with_allow_http(true);
    }

    let store = builder
        .build()
        .context_int_err(format!("Failed to create S3 store for bucket {bucket}"))?;

    Ok(Arc::new(store))
}
