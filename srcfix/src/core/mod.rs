//! Deterministic, pure rewrite logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! text and return deterministic outputs suitable for tests.

pub mod catalog;
pub mod engine;
pub mod guard;
pub mod rule;
pub mod rule_set;
pub mod template;
pub mod types;
