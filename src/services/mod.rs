//! Wrappers around external programs.

pub mod ffmpeg;
pub mod installer;
