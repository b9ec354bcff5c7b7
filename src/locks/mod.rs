//! Lock storage for lockcron.
//!
//! Every pending schedule occurrence is one file in the lock directory. The
//! filename encodes the whole occurrence:
//! - term lock: `<executeTimestamp>-<ufid>`
//! - interval lock: `<executeTimestamp>-<ufid>-<intervalTimestamp>`
//!
//! # Claiming
//!
//! An occurrence fires only in the tick that manages to delete its file.
//! Because unlink of a given name succeeds for exactly one caller, processes
//! sharing a lock directory never fire the same occurrence twice.
//!
//! # Lock Content
//!
//! Files carry a small JSON document (`owner`, `pid`, `created_at`) for
//! humans inspecting the directory. Scheduling never depends on it.

mod metadata;
mod store;
mod types;


pub use metadata::LockMetadata;
pub(crate) use metadata::get_owner_string;
pub use store::LockStore;
pub use types::{LockEntry, LockKind, SEPARATOR, validate_ufid};
