//! Integration tests for file selection.
//!
//! Tests cover:
//! - Extension filtering and omitted counts
//! - Output path derivation for accepted files

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use ts_converter::models::config::FfmpegConfig;
use ts_converter::models::selection::SelectedFileSet;
use ts_converter::utils::fs::swap_extension;

#[test]
fn test_wrong_extensions_never_become_jobs() {
    let temp_dir = TempDir::new().unwrap();
    let names = ["rec1.ts", "poster.jpg", "rec2.ts", "rec3.ts.part", "notes"];
    let paths: Vec<PathBuf> = names
        .iter()
        .map(|n| {
            let p = temp_dir.path().join(n);
            fs::write(&p, "x").unwrap();
            p
        })
        .collect();

    let config = FfmpegConfig::default();
    let selection = SelectedFileSet::open_multiple(paths, &config);
    assert_eq!(selection.omitted().len(), 3);
    assert_eq!(
        selection.summary(),
        "5 files selected. Non .ts files were omitted (3/5)"
    );

    let (jobs, rejected) = selection.into_jobs(&config);
    assert!(rejected.is_empty());
    let inputs: Vec<String> = jobs.iter().map(|j| j.input_filename()).collect();
    assert_eq!(inputs, vec!["rec1.ts", "rec2.ts"]);
}

#[test]
fn test_output_name_swaps_back_to_input() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("show.ts.d");
    fs::create_dir(&dir).unwrap();
    let input = dir.join("episode.01.ts");
    fs::write(&input, "x").unwrap();

    let config = FfmpegConfig::default();
    let selection = SelectedFileSet::open_single(input, &config);
    let (jobs, _) = selection.into_jobs(&config);
    let job = &jobs[0];

    assert_eq!(job.output().file_name().unwrap(), "episode.01.mp4");
    assert_eq!(job.output().parent().unwrap().file_name().unwrap(), "show.ts.d");
    assert_eq!(swap_extension(job.output(), "ts"), job.input());
}

#[test]
fn test_reselection_replaces_previous_set() {
    let config = FfmpegConfig::default();
    let first = SelectedFileSet::open_multiple(
        vec![PathBuf::from("a.ts"), PathBuf::from("b.ts")],
        &config,
    );
    assert_eq!(first.files().len(), 2);

    let second = SelectedFileSet::open_single(PathBuf::from("c.ts"), &config);
    assert_eq!(second.files(), &[PathBuf::from("c.ts")]);
    assert_eq!(second.total(), 1);
}
