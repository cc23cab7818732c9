use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "gcs_helper",
    about = "Upload and download data to/from Google Cloud Storage"
)]
struct Cli {
    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, env = "GCS_LOG_LEVEL", default_value = "info", global = true)]
    log_level: LevelFilter,

    #[command(flatten)]
    sample: SampleArgs,

    #[command(subcommand)]
    cmd: Option<Commands>,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[arg(long, env = "GCS_BUCKET_NAME", default_value = "prod-dp")]
    bucket: String,
    #[arg(long, env = "GCS_PREFIX", default_value = "data_test_check")]
    prefix: String,
    #[arg(long, env = "GCS_FILE_NAME", default_value = "canhld")]
    name: String,
    #[arg(long, env = "GCS_FILE_FORMAT", default_value = "csv")]
    format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload the built-in sample table (what runs without a command)
    UploadSample(SampleArgs),

    /// List the project's buckets
    Buckets,

    /// Upload a local file to a gs:// URL
    Upload { path: PathBuf, url: String },

    /// Download one object, or every object of a format under a prefix
    Download {
        /// gs://bucket/key in single mode, gs://bucket/prefix in full mode
        url: String,
        #[arg(long, default_value = "single")]
        mode: String,
        #[arg(long, env = "GCS_FILE_FORMAT", default_value = "csv")]
        format: String,
        /// File (single) or directory (full); defaults to data_downloaded/
        #[arg(long)]
        dest: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(cli.log_level);
    let client = common::connect(cli.log_level)?;

    match cli.cmd.unwrap_or(Commands::UploadSample(cli.sample)) {
        Commands::UploadSample(args) => commands::upload_sample::run(
            &client,
            &args.bucket,
            &args.prefix,
            &args.name,
            &args.format,
        ),
        Commands::Buckets => commands::buckets::run(&client),
        Commands::Upload { path, url } => commands::upload::run(&client, &path, &url),
        Commands::Download {
            url,
            mode,
            format,
            dest,
        } => commands::download::run(&client, &url, &mode, &format, dest.as_deref()),
    }
}

mod commands;
mod common;
