//! setup-bucket command - Create and configure a bucket for website hosting
//!
//! Creates the bucket (reusing it if already owned), applies the public-read
//! policy, and enables website hosting with index.html / error.html.

use clap::Args;
use serde::Serialize;
use webotron_core::website_endpoint;

use super::{GlobalArgs, get_bucket_manager};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Create and configure an S3 bucket for website hosting
#[derive(Args, Debug)]
pub struct SetupBucketArgs {
    /// Bucket name
    pub bucket: String,
}

#[derive(Debug, Serialize)]
struct SetupOutput {
    bucket: String,
    created: bool,
    region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    website_url: Option<String>,
}

/// Execute the setup-bucket command
pub async fn execute(
    args: SetupBucketArgs,
    global: &GlobalArgs,
    formatter: &Formatter,
) -> ExitCode {
    let manager = match get_bucket_manager(global, formatter).await {
        Ok(m) => m,
        Err(code) => return code,
    };

    let bucket = match manager.init_bucket(&args.bucket).await {
        Ok(b) => b,
        Err(e) => {
            formatter.error(&format!("Failed to create bucket '{}': {e}", args.bucket));
            return ExitCode::from_error(&e);
        }
    };

    let name = formatter.style_name(&bucket.name);
    if bucket.created {
        formatter.success(&format!("Created bucket '{name}'."));
    } else {
        formatter.warning(&format!(
            "Bucket '{name}' already exists and is owned by you, reusing it."
        ));
    }

    if let Err(e) = manager.set_policy(&bucket).await {
        formatter.error(&format!("Failed to set policy on '{}': {e}", bucket.name));
        return ExitCode::from_error(&e);
    }
    formatter.success("Applied public-read policy.");

    if let Err(e) = manager.configure_website(&bucket).await {
        formatter.error(&format!(
            "Failed to configure website on '{}': {e}",
            bucket.name
        ));
        return ExitCode::from_error(&e);
    }
    formatter.success("Enabled website hosting (index.html / error.html).");

    let store = manager.store();
    let website_url = match store.endpoint_url() {
        Some(_) => None,
        None => Some(website_endpoint(&bucket.name, store.region())),
    };

    if formatter.is_json() {
        formatter.json(&SetupOutput {
            bucket: bucket.name.clone(),
            created: bucket.created,
            region: store.region().to_string(),
            website_url,
        });
    } else if let Some(url) = website_url {
        let styled_url = formatter.style_url(&url);
        formatter.println(&format!("Website: {styled_url}"));
    }

    ExitCode::Success
}
