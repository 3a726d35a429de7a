//! Install command implementation.

use crate::services::ffmpeg;
use crate::services::installer::{InstallPlan, Installer};
use crate::models::config::FfmpegConfig;
use crate::Result;
use colored::Colorize;

/// Install FFmpeg with the host's package manager.
pub async fn install(config: &FfmpegConfig, installer: &Installer, dry_run: bool) -> Result<()> {
    if let InstallPlan::Unsupported(reason) = installer.plan() {
        return Err(crate::Error::UnsupportedPlatform(reason.clone()));
    }

    println!(
        "  {} {}",
        "Install command:".bold(),
        installer.plan().describe().cyan()
    );

    if dry_run {
        return Ok(());
    }

    if ffmpeg::is_available(&config.program).await {
        println!("{}", "[OK] FFmpeg detected.".green());
        return Ok(());
    }

    println!("{}", "[INSTALL] Installing FFmpeg...".bold().cyan());
    if !installer.install().await {
        return Err(crate::Error::InstallFailed(
            "Unable to install FFmpeg".to_string(),
        ));
    }

    println!("{}", "[OK] FFmpeg installed.".bold().green());
    Ok(())
}
