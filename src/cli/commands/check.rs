//! Check command implementation.

use crate::models::config::FfmpegConfig;
use crate::preflight;
use crate::Result;
use colored::Colorize;

/// Report whether FFmpeg is available.
pub async fn check(config: &FfmpegConfig) -> Result<()> {
    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = vec![preflight::check(config).await];
    preflight::print_results(&results);

    if !preflight::all_passed(&results) {
        return Err(crate::Error::FfmpegNotFound);
    }

    Ok(())
}
