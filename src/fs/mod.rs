//! Filesystem utilities for lockcron.
//!
//! Lock files are created exclusively by the lock store; everything else
//! lockcron writes (the config template) goes through an atomic replace.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
