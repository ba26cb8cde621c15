//! sync command - Upload a local directory tree into a bucket
//!
//! Every file is uploaded on every run, one at a time, keyed by its path
//! relative to PATHNAME.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use webotron_core::{Error, LocalFile, SyncEvent, SyncReport, local};

use super::{GlobalArgs, get_bucket_manager};
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Sync contents of PATHNAME to BUCKET
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Local directory to upload
    pub pathname: PathBuf,

    /// Destination bucket
    pub bucket: String,

    /// Show what would be uploaded without uploading
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct SyncOutput {
    bucket: String,
    root: PathBuf,
    uploaded: usize,
    total_bytes: u64,
    dry_run: bool,
    files: Vec<SyncedFile>,
}

#[derive(Debug, Serialize)]
struct SyncedFile {
    key: String,
    content_type: String,
    size_bytes: u64,
}

impl From<&LocalFile> for SyncedFile {
    fn from(file: &LocalFile) -> Self {
        Self {
            key: file.key.clone(),
            content_type: file.content_type.clone(),
            size_bytes: file.size_bytes,
        }
    }
}

impl From<SyncReport> for SyncOutput {
    fn from(report: SyncReport) -> Self {
        Self {
            uploaded: report.files.len(),
            total_bytes: report.total_bytes(),
            dry_run: false,
            files: report.files.iter().map(SyncedFile::from).collect(),
            bucket: report.bucket,
            root: report.root,
        }
    }
}

impl SyncOutput {
    fn dry_run(bucket: &str, root: PathBuf, files: &[LocalFile]) -> Self {
        Self {
            bucket: bucket.to_string(),
            root,
            uploaded: 0,
            total_bytes: files.iter().map(|f| f.size_bytes).sum(),
            dry_run: true,
            files: files.iter().map(SyncedFile::from).collect(),
        }
    }
}

/// Execute the sync command
pub async fn execute(args: SyncArgs, global: &GlobalArgs, formatter: &Formatter) -> ExitCode {
    if args.dry_run {
        return match local::scan(&args.pathname) {
            Ok((root, files)) => {
                print_dry_run(&args.bucket, root, &files, formatter);
                ExitCode::Success
            }
            Err(e) => report_bad_path(&args, &e, formatter),
        };
    }

    // Resolve the root first so a bad path fails before any network call
    let root = match local::resolve_root(&args.pathname) {
        Ok(root) => root,
        Err(e) => return report_bad_path(&args, &e, formatter),
    };

    let manager = match get_bucket_manager(global, formatter).await {
        Ok(m) => m,
        Err(code) => return code,
    };

    let mut progress: Option<ProgressBar> = None;
    let result = manager
        .sync(&root, &args.bucket, |event| match event {
            SyncEvent::Scanned(files) => {
                if formatter.show_progress() {
                    progress = Some(upload_progress_bar(files.len() as u64));
                }
            }
            SyncEvent::Uploaded(file) => {
                if let Some(ref pb) = progress {
                    pb.println(format!(
                        "+ {} ({})",
                        formatter.style_file(&file.key),
                        formatter.style_date(&file.content_type)
                    ));
                    pb.set_message(file.key.clone());
                    pb.inc(1);
                }
            }
        })
        .await;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let Some(pb) = progress {
                pb.abandon();
            }
            formatter.error(&format!("Failed to sync to '{}': {e}", args.bucket));
            return ExitCode::from_error(&e);
        }
    };

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    let output = SyncOutput::from(report);
    if formatter.is_json() {
        formatter.json(&output);
    } else {
        let size = humansize::format_size(output.total_bytes, humansize::BINARY);
        let name = formatter.style_name(&args.bucket);
        formatter.success(&format!(
            "Synced {} file(s) ({}) to '{name}'.",
            output.uploaded,
            formatter.style_size(&size)
        ));
    }

    ExitCode::Success
}

fn report_bad_path(args: &SyncArgs, error: &Error, formatter: &Formatter) -> ExitCode {
    formatter.error(&format!("Cannot sync '{}': {error}", args.pathname.display()));
    ExitCode::from_error(error)
}

fn upload_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message("Uploading...");
    pb
}

fn print_dry_run(bucket: &str, root: PathBuf, files: &[LocalFile], formatter: &Formatter) {
    let output = SyncOutput::dry_run(bucket, root, files);

    if formatter.is_json() {
        formatter.json(&output);
        return;
    }

    formatter.println("Dry run mode - no changes will be made:");
    formatter.println("");
    if files.is_empty() {
        formatter.println("Nothing to upload.");
        return;
    }

    formatter.println(&format!("Would upload {} object(s):", files.len()));
    for file in files {
        let size = humansize::format_size(file.size_bytes, humansize::BINARY);
        formatter.println(&format!(
            "  + {} ({}, {})",
            formatter.style_file(&file.key),
            file.content_type,
            formatter.style_size(&size)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_file(key: &str, content_type: &str, size: u64) -> LocalFile {
        LocalFile {
            path: PathBuf::from("/srv/site").join(key),
            key: key.to_string(),
            size_bytes: size,
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn test_sync_output_counts() {
        let report = SyncReport {
            bucket: "my-site".to_string(),
            root: PathBuf::from("/srv/site"),
            files: vec![
                local_file("index.html", "text/html", 100),
                local_file("css/site.css", "text/css", 50),
            ],
        };
        let output = SyncOutput::from(report);
        assert!(!output.dry_run);
        assert_eq!(output.uploaded, 2);
        assert_eq!(output.total_bytes, 150);
        assert_eq!(output.files[1].key, "css/site.css");
    }

    #[test]
    fn test_dry_run_uploads_nothing() {
        let files = vec![local_file("index.html", "text/html", 100)];
        let output = SyncOutput::dry_run("my-site", PathBuf::from("/srv/site"), &files);
        assert_eq!(output.uploaded, 0);
        assert!(output.dry_run);
        assert_eq!(output.files.len(), 1);
    }

    #[test]
    fn test_sync_output_json_shape() {
        let report = SyncReport {
            bucket: "my-site".to_string(),
            root: PathBuf::from("/srv/site"),
            files: vec![local_file("index.html", "text/html", 7)],
        };
        let output = SyncOutput::from(report);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["bucket"], "my-site");
        assert_eq!(json["files"][0]["content_type"], "text/html");
        assert_eq!(json["files"][0]["size_bytes"], 7);
    }
}
