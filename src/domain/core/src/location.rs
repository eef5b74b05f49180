// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Component, Path, PathBuf};

use datafusion::execution::object_store::ObjectStoreUrl;
use url::Url;

use crate::InvalidLocationError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Where input is read from or output is written to.
///
/// Hadoop-style `s3a://` and `s3n://` schemes are accepted and normalized to
/// `s3://`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// Absolute local path, may contain glob wildcards
    Local(PathBuf),
    /// `s3://<bucket>/<key prefix>`
    S3(Url),
}

impl StorageLocation {
    pub fn parse(s: &str) -> Result<Self, InvalidLocationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidLocationError::new(s, "location is empty"));
        }

        if s.contains("://") {
            let url = Url::parse(s).map_err(|e| InvalidLocationError::new(s, e.to_string()))?;

            return match url.scheme() {
                "s3" | "s3a" | "s3n" => Self::from_s3_url(s, &url),
                "file" => url
                    .to_file_path()
                    .map(Self::Local)
                    .map_err(|()| InvalidLocationError::new(s, "not a valid file path")),
                scheme => Err(InvalidLocationError::new(
                    s,
                    format!("unsupported scheme '{scheme}', expected a local path or s3://"),
                )),
            };
        }

        let path = PathBuf::from(s);
        if path.is_absolute() {
            Ok(Self::Local(path))
        } else {
            let cwd = std::env::current_dir()
                .map_err(|e| InvalidLocationError::new(s, format!("cannot resolve: {e}")))?;
            Ok(Self::Local(cwd.join(path)))
        }
    }

    fn from_s3_url(s: &str, url: &Url) -> Result<Self, InvalidLocationError> {
        let bucket = match url.host_str() {
            Some(bucket) if !bucket.is_empty() => bucket,
            _ => return Err(InvalidLocationError::new(s, "bucket name is missing")),
        };

        if url.path().contains(GLOB_CHARS) {
            return Err(InvalidLocationError::new(
                s,
                "glob patterns are only supported for local paths, point to a directory instead",
            ));
        }

        let url = Url::parse(&format!("s3://{bucket}{}", url.path()))
            .map_err(|e| InvalidLocationError::new(s, e.to_string()))?;

        Ok(Self::S3(url))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::S3(_))
    }

    pub fn bucket(&self) -> Option<&str> {
        match self {
            Self::Local(_) => None,
            Self::S3(url) => url.host_str(),
        }
    }

    pub fn has_glob(&self) -> bool {
        match self {
            Self::Local(path) => path.to_string_lossy().contains(GLOB_CHARS),
            Self::S3(_) => false,
        }
    }

    /// Returns a child location, e.g. a table directory under the output root
    pub fn join(&self, name: &str) -> Self {
        match self {
            Self::Local(path) => Self::Local(path.join(name)),
            Self::S3(url) => {
                let mut url = url.clone();
                let path = format!("{}/{name}", url.path().trim_end_matches('/'));
                url.set_path(&path);
                Self::S3(url)
            }
        }
    }

    /// Location in the form understood by the engine's listing tables:
    /// directories get a trailing slash, globs are passed as is
    pub fn to_table_url(&self) -> String {
        match self {
            Self::Local(path) => {
                let path = path.to_string_lossy();
                if self.has_glob() || path.ends_with('/') {
                    path.into_owned()
                } else {
                    format!("{path}/")
                }
            }
            Self::S3(url) => {
                let url = url.as_str();
                if url.ends_with('/') {
                    url.to_string()
                } else {
                    format!("{url}/")
                }
            }
        }
    }

    /// Root URL of the object store that serves this location
    pub fn object_store_url(&self) -> Result<ObjectStoreUrl, InvalidLocationError> {
        match self {
            Self::Local(_) => Ok(ObjectStoreUrl::local_filesystem()),
            Self::S3(url) => {
                let bucket = url.host_str().unwrap_or_default();
                ObjectStoreUrl::parse(format!("s3://{bucket}"))
                    .map_err(|e| InvalidLocationError::new(url.as_str(), e.to_string()))
            }
        }
    }

    /// Object store path under which all objects of this location are found.
    /// For globs this is the part of the path preceding the first wildcard.
    pub fn listing_prefix(&self) -> Result<object_store::path::Path, InvalidLocationError> {
        match self {
            Self::Local(path) => {
                let prefix = glob_free_prefix(path);
                object_store::path::Path::from_absolute_path(&prefix).map_err(|e| {
                    InvalidLocationError::new(path.to_string_lossy(), e.to_string())
                })
            }
            Self::S3(url) => Ok(object_store::path::Path::from(url.path())),
        }
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::S3(url) => write!(f, "{url}"),
        }
    }
}

impl std::str::FromStr for StorageLocation {
    type Err = InvalidLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn glob_free_prefix(path: &Path) -> PathBuf {
    path.components()
        .take_while(|c| match c {
            Component::Normal(s) => !s.to_string_lossy().contains(GLOB_CHARS),
            _ => true,
        })
        .collect()
}
