//! I/O adapters for srcfix commands.

pub mod config;
pub mod report;
pub mod walk;
pub mod writer;
