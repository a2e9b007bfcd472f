//! Bulk, rule-driven source rewriting.
//!
//! A run applies an ordered catalog of rule sets to every candidate file and
//! writes a file back only when its content changed. The crate keeps a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (rules, guards, the rewrite
//!   engine). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, file walking, writing,
//!   reporting).
//!
//! [`batch`] coordinates the two to implement the CLI commands.

pub mod batch;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
