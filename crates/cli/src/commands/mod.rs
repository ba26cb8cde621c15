//! Command definitions and dispatch

mod completions;
mod list_buckets;
mod list_objects;
mod setup_bucket;
mod sync;

use clap::{Args, Parser, Subcommand};
use webotron_core::{BucketManager, ConfigManager};
use webotron_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Webotron deploys websites to AWS.
#[derive(Parser, Debug)]
#[command(name = "webotron", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// AWS credential profile to use
    #[arg(long, global = true, env = "WEBOTRON_PROFILE")]
    pub profile: Option<String>,

    /// Region to create buckets in (defaults to the profile's region)
    #[arg(long, global = true, env = "WEBOTRON_REGION")]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services
    #[arg(long, global = true, env = "WEBOTRON_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

impl GlobalArgs {
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            json: self.json,
            no_color: self.no_color,
            quiet: self.quiet,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all S3 buckets
    #[command(name = "list-buckets")]
    ListBuckets,

    /// List objects in an S3 bucket
    #[command(name = "list-bucket-objects")]
    ListBucketObjects(list_objects::ListObjectsArgs),

    /// Create and configure an S3 bucket for website hosting
    #[command(name = "setup-bucket")]
    SetupBucket(setup_bucket::SetupBucketArgs),

    /// Sync contents of PATHNAME to BUCKET
    Sync(sync::SyncArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the parsed command line
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(cli.global.output_config());
    if !formatter.colors_enabled() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    match cli.command {
        Commands::ListBuckets => list_buckets::execute(&cli.global, &formatter).await,
        Commands::ListBucketObjects(args) => {
            list_objects::execute(args, &cli.global, &formatter).await
        }
        Commands::SetupBucket(args) => setup_bucket::execute(args, &cli.global, &formatter).await,
        Commands::Sync(args) => sync::execute(args, &cli.global, &formatter).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Build a bucket manager for the configured session
///
/// Settings come from the config file, overridden by global flags.
pub(crate) async fn get_bucket_manager(
    global: &GlobalArgs,
    formatter: &Formatter,
) -> Result<BucketManager<S3Client>, ExitCode> {
    let config = match ConfigManager::new().and_then(|cm| cm.load()) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("Failed to load configuration: {e}"));
            return Err(ExitCode::from_error(&e));
        }
    };

    let settings = config.aws.with_overrides(
        global.profile.clone(),
        global.region.clone(),
        global.endpoint_url.clone(),
    );
    tracing::debug!(?settings, "Resolved session settings");

    match S3Client::new(&settings).await {
        Ok(client) => Ok(BucketManager::new(client)),
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            Err(ExitCode::from_error(&e))
        }
    }
}
