//! The user's current file selection.

use crate::models::config::FfmpegConfig;
use crate::models::job::ConversionJob;
use crate::utils::fs;
use std::path::PathBuf;

/// How the selection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    Multiple,
}

/// Files chosen for the next conversion batch.
///
/// Each `open_*` call builds a fresh set; paths without the source extension
/// are dropped and counted as omitted.
#[derive(Debug, Clone)]
pub struct SelectedFileSet {
    mode: SelectionMode,
    source_extension: String,
    files: Vec<PathBuf>,
    omitted: Vec<PathBuf>,
}

impl SelectedFileSet {
    /// Select one file.
    pub fn open_single(path: PathBuf, config: &FfmpegConfig) -> Self {
        Self::build(SelectionMode::Single, vec![path], config)
    }

    /// Select several files at once.
    pub fn open_multiple(paths: Vec<PathBuf>, config: &FfmpegConfig) -> Self {
        Self::build(SelectionMode::Multiple, paths, config)
    }

    /// Pick the mode from the number of paths given.
    pub fn from_paths(mut paths: Vec<PathBuf>, config: &FfmpegConfig) -> Self {
        if paths.len() == 1 {
            let path = paths.remove(0);
            Self::open_single(path, config)
        } else {
            Self::open_multiple(paths, config)
        }
    }

    fn build(mode: SelectionMode, paths: Vec<PathBuf>, config: &FfmpegConfig) -> Self {
        let (files, omitted): (Vec<_>, Vec<_>) = paths
            .into_iter()
            .partition(|p| fs::has_extension(p, &config.source_extension));

        for path in &omitted {
            tracing::info!("Invalid file detected: {}", fs::display_name(path));
        }

        Self {
            mode,
            source_extension: config.source_extension.clone(),
            files,
            omitted,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Accepted paths, in selection order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Paths dropped for having the wrong extension.
    pub fn omitted(&self) -> &[PathBuf] {
        &self.omitted
    }

    /// Number of paths offered, accepted or not.
    pub fn total(&self) -> usize {
        self.files.len() + self.omitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Status line describing the selection.
    pub fn summary(&self) -> String {
        if self.total() == 0 {
            return "No files selected.".to_string();
        }

        match self.mode {
            SelectionMode::Single => match self.files.first() {
                Some(path) => path.display().to_string(),
                None => format!(
                    "Invalid file selected. Only .{} files are supported.",
                    self.source_extension
                ),
            },
            SelectionMode::Multiple => format!(
                "{} files selected. Non .{} files were omitted ({}/{})",
                self.total(),
                self.source_extension,
                self.omitted.len(),
                self.total()
            ),
        }
    }

    /// Turn the selection into jobs, keeping selection order.
    ///
    /// Files that fail validation (missing, not a regular file) are
    /// returned alongside the error instead of becoming jobs.
    pub fn into_jobs(self, config: &FfmpegConfig) -> (Vec<ConversionJob>, Vec<(PathBuf, crate::Error)>) {
        let mut jobs = Vec::with_capacity(self.files.len());
        let mut rejected = Vec::new();

        for path in self.files {
            match ConversionJob::new(&path, config) {
                Ok(job) => jobs.push(job),
                Err(e) => rejected.push((path, e)),
            }
        }

        (jobs, rejected)
    }
}
