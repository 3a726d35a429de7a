//! FFmpeg preflight check.

use super::CheckResult;
use crate::models::config::FfmpegConfig;
use crate::services::ffmpeg;
use crate::services::installer::Installer;

/// Check if ffmpeg is installed.
pub async fn check(config: &FfmpegConfig) -> CheckResult {
    if ffmpeg::is_available(&config.program).await {
        match ffmpeg::get_version(&config.program).await {
            Ok(version) => CheckResult::ok("ffmpeg", &format!("installed ({})", version)),
            Err(_) => CheckResult::ok("ffmpeg", "installed"),
        }
    } else {
        CheckResult::fail("ffmpeg", "not found", "Install FFmpeg: ts-converter install")
    }
}

/// Startup flow: detect FFmpeg, and install through the package manager if absent.
///
/// Never fails hard. A failed install leaves the application degraded;
/// conversions will then fail on their own.
pub async fn ensure_installed(config: &FfmpegConfig, installer: &Installer) -> CheckResult {
    if ffmpeg::is_available(&config.program).await {
        tracing::info!("FFmpeg detected.");
        return check(config).await;
    }

    tracing::info!("FFmpeg not found, installing with: {}", installer.plan().describe());
    if !installer.install().await {
        tracing::warn!("Unable to install FFmpeg");
        return CheckResult::fail(
            "ffmpeg",
            "not found and installation failed",
            &format!("Install it manually: {}", installer.plan().describe()),
        );
    }

    check(config).await
}
