//! Stable exit codes for `leptons` CLI commands.

/// Command succeeded; every event was processed.
pub const OK: i32 = 0;
/// Invalid config or event file, or the run aborted on an event error.
pub const INVALID: i32 = 1;
/// `leptons run` completed but skipped at least one failed event.
pub const EVENTS_FAILED: i32 = 2;
