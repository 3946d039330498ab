//! Process exit codes. These are part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const REPORT_FAILED: i32 = 1; // Report generation or merge rejected the runs
pub const CONFIG_ERROR: i32 = 2; // Unreadable input, bad config or bad arguments
