//! Bucket manager
//!
//! High-level website deployment operations built on a [`WebsiteStore`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::local::{self, LocalFile};
use crate::traits::{BucketInfo, ObjectInfo, WebsiteStore};
use crate::website::{WebsiteConfiguration, public_read_policy};

/// Handle to a bucket returned by [`BucketManager::init_bucket`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub name: String,

    /// False when the bucket already existed and is owned by the caller
    pub created: bool,
}

/// Outcome of a directory sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub bucket: String,
    pub root: PathBuf,
    pub files: Vec<LocalFile>,
}

/// Progress notifications emitted by [`BucketManager::sync`]
#[derive(Debug, Clone, Copy)]
pub enum SyncEvent<'a> {
    /// The tree was walked; these files will be uploaded in order
    Scanned(&'a [LocalFile]),

    /// One file finished uploading
    Uploaded(&'a LocalFile),
}

impl SyncReport {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }
}

/// Manage buckets and their website content
pub struct BucketManager<S> {
    store: S,
}

impl<S: WebsiteStore> BucketManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn all_buckets(&self) -> Result<Vec<BucketInfo>> {
        self.store.list_buckets().await
    }

    pub async fn all_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        self.store.list_objects(bucket).await
    }

    /// Create a bucket, or reuse it if the caller already owns it
    pub async fn init_bucket(&self, name: &str) -> Result<Bucket> {
        match self.store.create_bucket(name).await {
            Ok(()) => {
                tracing::info!(bucket = name, "Created bucket");
                Ok(Bucket {
                    name: name.to_string(),
                    created: true,
                })
            }
            Err(Error::BucketAlreadyOwned(_)) => {
                tracing::warn!(bucket = name, "Bucket already owned, reusing it");
                Ok(Bucket {
                    name: name.to_string(),
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Allow anonymous reads of every object in the bucket
    pub async fn set_policy(&self, bucket: &Bucket) -> Result<()> {
        let policy = public_read_policy(&bucket.name);
        self.store.put_bucket_policy(&bucket.name, &policy).await?;
        tracing::info!(bucket = %bucket.name, "Applied public-read policy");
        Ok(())
    }

    /// Enable website hosting with the standard index and error documents
    pub async fn configure_website(&self, bucket: &Bucket) -> Result<()> {
        let website = WebsiteConfiguration::default();
        self.store.put_bucket_website(&bucket.name, &website).await?;
        tracing::info!(bucket = %bucket.name, "Enabled website hosting");
        Ok(())
    }

    /// Create and fully configure a bucket for website hosting
    pub async fn setup_bucket(&self, name: &str) -> Result<Bucket> {
        let bucket = self.init_bucket(name).await?;
        self.set_policy(&bucket).await?;
        self.configure_website(&bucket).await?;
        Ok(bucket)
    }

    /// Upload `files` one at a time, calling `on_uploaded` after each
    ///
    /// Stops at the first failure.
    async fn upload_all<F>(
        &self,
        bucket: &str,
        files: &[LocalFile],
        mut on_uploaded: F,
    ) -> Result<()>
    where
        F: FnMut(&LocalFile),
    {
        for file in files {
            tracing::debug!(
                key = %file.key,
                content_type = %file.content_type,
                "Uploading"
            );
            self.store
                .upload_file(bucket, &file.key, &file.path, &file.content_type)
                .await?;
            on_uploaded(file);
        }
        Ok(())
    }

    /// Upload every file under `pathname` into `bucket`
    ///
    /// `on_progress` sees the scanned file list once, then each file as it
    /// finishes uploading.
    pub async fn sync<F>(
        &self,
        pathname: &Path,
        bucket: &str,
        mut on_progress: F,
    ) -> Result<SyncReport>
    where
        F: FnMut(SyncEvent<'_>),
    {
        let (root, files) = local::scan(pathname)?;
        on_progress(SyncEvent::Scanned(&files));
        self.upload_all(bucket, &files, |file| on_progress(SyncEvent::Uploaded(file)))
            .await?;
        tracing::info!(bucket, files = files.len(), "Sync complete");
        Ok(SyncReport {
            bucket: bucket.to_string(),
            root,
            files,
        })
    }
}
