//! list-bucket-objects command - List every object in a bucket

use clap::Args;
use comfy_table::{Table, presets::NOTHING};
use serde::Serialize;
use webotron_core::ObjectInfo;

use super::{GlobalArgs, get_bucket_manager};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// List objects in an S3 bucket
#[derive(Args, Debug)]
pub struct ListObjectsArgs {
    /// Bucket name
    pub bucket: String,
}

#[derive(Debug, Serialize)]
struct ObjectListOutput {
    bucket: String,
    objects: Vec<ObjectInfo>,
}

/// Execute the list-bucket-objects command
pub async fn execute(
    args: ListObjectsArgs,
    global: &GlobalArgs,
    formatter: &Formatter,
) -> ExitCode {
    let manager = match get_bucket_manager(global, formatter).await {
        Ok(m) => m,
        Err(code) => return code,
    };

    let objects = match manager.all_objects(&args.bucket).await {
        Ok(o) => o,
        Err(e) => {
            formatter.error(&format!("Failed to list objects in '{}': {e}", args.bucket));
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&ObjectListOutput {
            bucket: args.bucket,
            objects,
        });
    } else if objects.is_empty() {
        let name = formatter.style_name(&args.bucket);
        formatter.println(&format!("Bucket '{name}' is empty."));
    } else {
        formatter.println(&object_table(&objects, formatter).to_string());
    }

    ExitCode::Success
}

fn object_table(objects: &[ObjectInfo], formatter: &Formatter) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);

    for object in objects {
        let modified = object
            .last_modified
            .map(|t| t.strftime("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let size = object.size_human.clone().unwrap_or_default();

        table.add_row(vec![
            formatter.style_date(&modified),
            formatter.style_size(&size),
            formatter.style_file(&object.key),
        ]);
    }

    table
}
