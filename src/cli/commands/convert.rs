//! Convert command implementation.
//!
//! Builds a selection from the given paths, queues every valid file and
//! renders the queue's events until all jobs have finished.

use crate::cli::render::{BatchSummary, EventRenderer};
use crate::core::queue::JobQueue;
use crate::models::config::Config;
use crate::models::job::QueueEvent;
use crate::models::selection::SelectedFileSet;
use crate::services::ffmpeg;
use crate::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

/// Grace period after Ctrl-C; FFmpeg gets the signal too and usually exits.
const INTERRUPT_GRACE: Duration = Duration::from_secs(5);

/// Convert the given files.
///
/// Individual conversion failures are not errors here; they are counted in
/// the returned summary.
pub async fn convert(files: Vec<PathBuf>, config: &Config, dry_run: bool) -> Result<BatchSummary> {
    let selection = SelectedFileSet::from_paths(files, &config.ffmpeg);
    println!("  {} {}", "Selected:".bold(), selection.summary());

    if selection.is_empty() {
        return Err(crate::Error::other(format!(
            "No .{} files to convert",
            config.ffmpeg.source_extension
        )));
    }

    let (jobs, rejected) = selection.into_jobs(&config.ffmpeg);
    for (_, e) in &rejected {
        println!("{} {}", "[SKIP]".yellow(), e);
    }
    if jobs.is_empty() {
        return Err(crate::Error::other("No valid files to convert"));
    }

    if dry_run {
        for job in &jobs {
            println!("{}", ffmpeg::command_line(job, &config.ffmpeg));
        }
        return Ok(BatchSummary::default());
    }

    println!();
    let total = jobs.len();
    let (queue, mut events) = JobQueue::with_channel(config.ffmpeg.clone());
    for job in jobs {
        queue.submit(job);
    }

    let mut renderer = EventRenderer::new(total);
    let mut finished = 0;
    let mut grace = config.queue.shutdown_grace();

    while finished < total {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    if matches!(event, QueueEvent::Finished { .. }) {
                        finished += 1;
                    }
                    renderer.handle(&event);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted, stopping conversions");
                grace = INTERRUPT_GRACE;
                break;
            }
        }
    }

    let report = queue.shutdown(grace).await;
    while let Ok(event) = events.try_recv() {
        renderer.handle(&event);
    }
    let summary = BatchSummary {
        stopped: report.forced,
        ..renderer.finish()
    };

    print_summary(&summary);
    Ok(summary)
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", "[Summary]".bold().yellow());
    println!("  {} {}", "Converted:".bold(), summary.succeeded.to_string().green());
    println!("  {} {}", "Failed:".bold(), summary.failed.to_string().red());
    if summary.stopped > 0 {
        println!("  {} {}", "Stopped:".bold(), summary.stopped.to_string().red());
    }
}
