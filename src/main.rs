//! TS Converter CLI
//!
//! Converts MPEG transport streams to MP4 with FFmpeg, installing FFmpeg
//! through the system package manager when it is missing.

use clap::Parser;
use ts_converter::cli::{
    args::{Cli, Commands},
    commands::{check, convert, install},
};
use ts_converter::models::config::{self, Config};
use ts_converter::preflight;
use ts_converter::services::installer::Installer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let mut config = config::load_config();
    let installer = Installer::detect();

    // Run the appropriate command
    match cli.command {
        Commands::Check => {
            check::check(&config.ffmpeg).await?;
        }

        Commands::Install { dry_run } => {
            install::install(&config.ffmpeg, &installer, dry_run).await?;
        }

        Commands::Convert {
            files,
            dry_run,
            overwrite,
            threads,
            grace,
        } => {
            config.ffmpeg.overwrite |= overwrite;
            if threads.is_some() {
                config.ffmpeg.threads = threads;
            }
            if let Some(secs) = grace {
                config.queue.shutdown_grace_secs = secs;
            }

            // Run preflight checks unless skipped
            if !cli.skip_preflight && !dry_run {
                run_preflight_checks(&config, &installer).await;
            }

            let summary = convert::convert(files, &config, dry_run).await?;
            if !summary.all_succeeded() {
                anyhow::bail!(
                    "{} of {} conversion(s) did not succeed",
                    summary.failed + summary.stopped,
                    summary.total()
                );
            }
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("ts_converter=debug")
    } else {
        EnvFilter::new("ts_converter=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Make sure FFmpeg is present, installing it if needed.
///
/// A failure is reported but not fatal; conversions will fail on their own.
async fn run_preflight_checks(config: &Config, installer: &Installer) {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = vec![preflight::ensure_installed(&config.ffmpeg, installer).await];
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        tracing::warn!("Continuing without a working FFmpeg; conversions will fail.");
    }
}
