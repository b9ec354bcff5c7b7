//! Exit code constants for the lockcron CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid ufid/unit/date, unknown or duplicate ufid)
//! - 2: Schedule conflict (interval or term lock already exists)
//! - 3: Lock directory I/O failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid schedule input, or registry misuse.
pub const USER_ERROR: i32 = 1;

/// Schedule conflict: the requested lock collides with an existing one.
pub const SCHEDULE_CONFLICT: i32 = 2;

/// I/O failure: the lock directory could not be read or written.
pub const IO_FAILURE: i32 = 3;
