//! TS Converter Library
//!
//! Detects (and installs) FFmpeg and converts MPEG transport streams to MP4
//! through a serialized background job queue.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
