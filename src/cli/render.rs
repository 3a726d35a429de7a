//! Terminal rendering of queue events.

use crate::models::job::QueueEvent;
use crate::utils::fs;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Counts of finished jobs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Jobs stopped at shutdown without a result.
    pub stopped: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.stopped
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.stopped == 0
    }
}

/// Prints FFmpeg output above a progress bar of finished jobs.
pub struct EventRenderer {
    pb: ProgressBar,
    summary: BatchSummary,
}

impl EventRenderer {
    pub fn new(total_jobs: usize) -> Self {
        let pb = ProgressBar::new(total_jobs as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        Self {
            pb,
            summary: BatchSummary::default(),
        }
    }

    /// Render one event.
    pub fn handle(&mut self, event: &QueueEvent) {
        match event {
            QueueEvent::Started { id, input } => {
                self.pb.set_message(fs::display_name(input));
                self.pb.println(format!(
                    "{} {} {}",
                    "[START]".bold().cyan(),
                    id,
                    input.display()
                ));
            }
            QueueEvent::Line { line, .. } => {
                self.pb.println(line);
            }
            QueueEvent::Finished { outcome, .. } => {
                let message = event.summary().unwrap_or_default();
                if outcome.is_success() {
                    self.summary.succeeded += 1;
                    self.pb.println(format!("{} {}", "[OK]".green(), message));
                } else {
                    self.summary.failed += 1;
                    self.pb.println(format!("{} {}", "[FAIL]".red(), message));
                }
                self.pb.inc(1);
            }
        }
    }

    /// Clear the bar and return the counts.
    pub fn finish(self) -> BatchSummary {
        self.pb.finish_and_clear();
        self.summary
    }
}
