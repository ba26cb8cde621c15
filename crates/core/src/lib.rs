//! webotron-core: Core library for the webotron website deployer
//!
//! This crate provides the core functionality for webotron, including:
//! - Configuration management
//! - The `WebsiteStore` trait for object-storage operations
//! - Bucket setup for public website hosting
//! - Local directory walking and content-type detection for sync
//!
//! This crate is independent of any specific S3 SDK so the deployment
//! logic can be tested against a mock store.

pub mod config;
pub mod error;
pub mod local;
pub mod manager;
pub mod traits;
pub mod website;

pub use config::{Config, ConfigManager, SessionConfig};
pub use error::{Error, Result};
pub use local::{LocalFile, content_type_for};
pub use manager::{Bucket, BucketManager, SyncEvent, SyncReport};
pub use traits::{BucketInfo, ObjectInfo, WebsiteStore};
pub use website::{WebsiteConfiguration, public_read_policy, website_endpoint};
