//! webotron-s3: S3 SDK adapter for webotron
//!
//! Implements the `WebsiteStore` trait from webotron-core on top of
//! aws-sdk-s3, with sessions built from named AWS credential profiles.

mod client;

pub use client::{DEFAULT_REGION, S3Client};
