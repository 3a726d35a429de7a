//! Core business logic modules.

pub mod lines;
pub mod queue;
