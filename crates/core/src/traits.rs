//! Storage abstraction
//!
//! `WebsiteStore` is the seam between webotron's logic and a concrete
//! object-storage SDK. Each method is a single provider call with no local
//! policy of its own; decisions such as reusing an owned bucket live in
//! [`crate::BucketManager`].

use std::path::Path;

use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;

use crate::error::Result;
use crate::website::WebsiteConfiguration;

/// A bucket as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketInfo {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
}

impl BucketInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created: None,
        }
    }
}

/// An object stored in a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl ObjectInfo {
    /// Create an object entry with a known size
    pub fn file(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size.max(0) as u64, humansize::BINARY)),
            last_modified: None,
            etag: None,
            storage_class: None,
        }
    }
}

/// Object-storage operations webotron needs from a provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebsiteStore: Send + Sync {
    /// List every bucket visible to the session
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>>;

    /// List every object in a bucket, following pagination to the end
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>>;

    /// Create a bucket in the session's region
    ///
    /// Returns [`crate::Error::BucketAlreadyOwned`] when the caller already
    /// owns a bucket with this name.
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Attach a JSON policy document to a bucket
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()>;

    /// Enable static website hosting on a bucket
    async fn put_bucket_website(
        &self,
        bucket: &str,
        website: &WebsiteConfiguration,
    ) -> Result<()>;

    /// Upload a local file as `key` with the given content type
    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()>;
}
