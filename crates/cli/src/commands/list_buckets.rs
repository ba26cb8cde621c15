//! list-buckets command - List every bucket in the account

use serde::Serialize;
use webotron_core::BucketInfo;

use super::{GlobalArgs, get_bucket_manager};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

#[derive(Debug, Serialize)]
struct BucketListOutput {
    buckets: Vec<BucketInfo>,
}

/// Execute the list-buckets command
pub async fn execute(global: &GlobalArgs, formatter: &Formatter) -> ExitCode {
    let manager = match get_bucket_manager(global, formatter).await {
        Ok(m) => m,
        Err(code) => return code,
    };

    let buckets = match manager.all_buckets().await {
        Ok(b) => b,
        Err(e) => {
            formatter.error(&format!("Failed to list buckets: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&BucketListOutput { buckets });
    } else if buckets.is_empty() {
        formatter.println("No buckets found.");
    } else {
        for bucket in &buckets {
            formatter.println(&format_bucket_line(bucket, formatter));
        }
    }

    ExitCode::Success
}

fn format_bucket_line(bucket: &BucketInfo, formatter: &Formatter) -> String {
    let name = formatter.style_name(&bucket.name);
    match &bucket.created {
        Some(created) => {
            let date = formatter.style_date(&created.strftime("%Y-%m-%d %H:%M:%S").to_string());
            format!("{date}  {name}")
        }
        None => name,
    }
}
