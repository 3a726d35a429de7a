//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TS Converter - Convert .ts recordings to .mp4 with FFmpeg
#[derive(Parser, Debug)]
#[command(name = "ts-converter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip the FFmpeg check (and automatic install) before converting
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether FFmpeg is installed
    Check,

    /// Install FFmpeg with the system package manager
    Install {
        /// Show the install command without running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Convert .ts files to .mp4, one at a time
    Convert {
        /// Files to convert (non-.ts files are skipped)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Print the FFmpeg command for each file without running it
        #[arg(long)]
        dry_run: bool,

        /// Overwrite existing .mp4 files
        #[arg(long)]
        overwrite: bool,

        /// Thread count for FFmpeg (default: all available cores)
        #[arg(long, value_name = "N")]
        threads: Option<usize>,

        /// Seconds to wait for queued conversions on shutdown
        #[arg(long, value_name = "SECS")]
        grace: Option<u64>,
    },
}
