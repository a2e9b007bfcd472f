//! Stable exit codes for srcfix CLI commands.

/// Command succeeded; for `check`, nothing would change.
pub const OK: i32 = 0;
/// Invalid configuration or arguments, or at least one file failed.
pub const INVALID: i32 = 1;
/// `srcfix check` found files that would be rewritten.
pub const PENDING: i32 = 2;
