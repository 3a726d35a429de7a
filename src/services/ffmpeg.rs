//! FFmpeg service: presence detection and conversion command building.

use crate::models::config::FfmpegConfig;
use crate::models::job::ConversionJob;
use crate::Result;
use os_pipe::PipeReader;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Encoder preset used for every conversion.
pub const PRESET: &str = "faster";

/// Marker FFmpeg prints at the start of `-version` output.
const VERSION_MARKER: &str = "ffmpeg version";

/// Check if FFmpeg is installed.
///
/// Failure to run the program is logged and reported as absent.
pub async fn is_available(program: &Path) -> bool {
    match run_version_query(program).await {
        Ok(output) => reports_version(&output),
        Err(e) => {
            tracing::warn!("Error checking FFmpeg: {}", e);
            false
        }
    }
}

/// Get the FFmpeg version line.
pub async fn get_version(program: &Path) -> Result<String> {
    let output = run_version_query(program).await?;
    let first_line = output.lines().next().unwrap_or("unknown");

    Ok(first_line.to_string())
}

/// Whether `-version` output identifies FFmpeg (case insensitive).
pub fn reports_version(output: &str) -> bool {
    output.to_lowercase().contains(VERSION_MARKER)
}

/// Run `<program> -version` and return stdout followed by stderr.
async fn run_version_query(program: &Path) -> Result<String> {
    let output = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .await?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(combined)
}

/// Arguments for converting one job.
///
/// The same thread count goes to general, filter and complex-filter
/// threading, since only one conversion runs at a time.
pub fn conversion_args(job: &ConversionJob, config: &FfmpegConfig) -> Vec<OsString> {
    let threads = config.thread_count().to_string();

    let mut args: Vec<OsString> = vec![
        "-i".into(),
        job.input().as_os_str().to_owned(),
        "-threads".into(),
        threads.clone().into(),
        "-preset".into(),
        PRESET.into(),
        "-filter_threads".into(),
        threads.clone().into(),
        "-filter_complex_threads".into(),
        threads.into(),
    ];

    if config.overwrite {
        args.push("-y".into());
    }

    args.push(job.output().as_os_str().to_owned());
    args
}

/// Spawn FFmpeg for one job.
///
/// stdout and stderr share one pipe, so the returned reader sees every line
/// in the order the process wrote it. stdin is piped so the process can be
/// asked to quit with `q`.
pub fn spawn_conversion(job: &ConversionJob, config: &FfmpegConfig) -> Result<(Child, PipeReader)> {
    let (reader, writer) = os_pipe::pipe()?;

    let mut cmd = Command::new(&config.program);
    cmd.args(conversion_args(job, config))
        .stdin(Stdio::piped())
        .stdout(writer.try_clone()?)
        .stderr(writer)
        .kill_on_drop(true);

    let child = cmd.spawn();
    // The command still owns the parent's copies of the write end; the
    // reader only sees EOF once they are closed.
    drop(cmd);

    Ok((child?, reader))
}

/// Printable, shell-quoted command line for a job.
pub fn command_line(job: &ConversionJob, config: &FfmpegConfig) -> String {
    let mut parts = vec![config.program.to_string_lossy().into_owned()];
    parts.extend(
        conversion_args(job, config)
            .iter()
            .map(|a| a.to_string_lossy().into_owned()),
    );

    shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
}
