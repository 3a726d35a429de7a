//! Conversion job model and the events the queue reports about it.

use crate::models::config::FfmpegConfig;
use crate::utils::fs;
use crate::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl JobId {
    /// Allocate the next job ID.
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        JobId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One source file to convert, with its derived output path.
///
/// Immutable once created. The input must exist and carry the configured
/// source extension; the output is the input with that extension swapped
/// for the target one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    id: JobId,
    input: PathBuf,
    output: PathBuf,
}

impl ConversionJob {
    /// Validate `input` and create a job for it.
    pub fn new(input: &Path, config: &FfmpegConfig) -> Result<Self> {
        fs::ensure_file(input)?;

        if !fs::has_extension(input, &config.source_extension) {
            return Err(crate::Error::UnsupportedExtension {
                path: input.display().to_string(),
                expected: config.source_extension.clone(),
            });
        }

        let input = std::fs::canonicalize(input)?;
        let output = fs::swap_extension(&input, &config.target_extension);

        Ok(Self {
            id: JobId::next(),
            input,
            output,
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Input file name, for messages.
    pub fn input_filename(&self) -> String {
        fs::display_name(&self.input)
    }
}

/// Terminal outcome of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The conversion tool exited with code 0.
    Succeeded,
    /// Non-zero exit, or the process could not be run to completion.
    Failed { reason: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded)
    }
}

/// Events emitted by the job queue worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// The job's process is about to be spawned.
    Started { id: JobId, input: PathBuf },
    /// One line of merged stdout/stderr output.
    Line { id: JobId, line: String },
    /// The job ended. Always the last event for `id`.
    Finished {
        id: JobId,
        input: PathBuf,
        outcome: JobOutcome,
    },
}

impl QueueEvent {
    /// ID of the job this event belongs to.
    pub fn job_id(&self) -> JobId {
        match self {
            QueueEvent::Started { id, .. }
            | QueueEvent::Line { id, .. }
            | QueueEvent::Finished { id, .. } => *id,
        }
    }

    /// Human-readable message for terminal events.
    pub fn summary(&self) -> Option<String> {
        match self {
            QueueEvent::Finished { input, outcome, .. } => {
                let name = fs::display_name(input);
                Some(match outcome {
                    JobOutcome::Succeeded => format!("Conversion successful for: {}", name),
                    JobOutcome::Failed { .. } => format!("Conversion failed for: {}", name),
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_derives_output_path() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.ts");
        std::fs::write(&input, "fake").unwrap();

        let job = ConversionJob::new(&input, &FfmpegConfig::default()).unwrap();
        assert_eq!(job.input_filename(), "clip.ts");
        assert_eq!(job.output().file_name().unwrap(), "clip.mp4");
        assert_eq!(job.output().parent(), job.input().parent());
    }

    #[test]
    fn test_new_rejects_other_extensions() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.mkv");
        std::fs::write(&input, "fake").unwrap();

        let err = ConversionJob::new(&input, &FfmpegConfig::default()).unwrap_err();
        assert!(matches!(err, crate::Error::UnsupportedExtension { .. }));
    }

    #[test]
    fn test_new_rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ConversionJob::new(&dir.path().join("gone.ts"), &FfmpegConfig::default())
            .unwrap_err();
        assert!(matches!(err, crate::Error::PathNotFound(_)));
    }

    #[test]
    fn test_ids_are_increasing() {
        let a = JobId::next();
        let b = JobId::next();
        assert!(b > a);
    }

    #[test]
    fn test_summary_names_file() {
        let event = QueueEvent::Finished {
            id: JobId(7),
            input: PathBuf::from("/videos/clip.ts"),
            outcome: JobOutcome::Failed {
                reason: "exit status: 1".to_string(),
            },
        };
        assert_eq!(event.summary().unwrap(), "Conversion failed for: clip.ts");
        assert_eq!(event.job_id(), JobId(7));
    }
}
