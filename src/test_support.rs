use crate::clock::ManualClock;
use crate::locks::{LockEntry, LockStore};
use crate::registry::ActivateFunction;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Tick period used across scheduler tests (the default 30s).
pub(crate) const PERIOD_MS: i64 = 30_000;

/// 2024-02-19T23:46:50Z, a round starting point for simulated clocks.
pub(crate) const T0: i64 = 1_708_386_410_000;

pub(crate) fn create_test_store() -> (TempDir, LockStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = LockStore::new(temp_dir.path().join("cron"));
    store.ensure_dir().unwrap();
    (temp_dir, store)
}

pub(crate) fn manual_clock() -> ManualClock {
    ManualClock::new(T0)
}

/// A callback that bumps `counter` each time it fires.
pub(crate) fn counting_function(counter: &Arc<AtomicUsize>) -> ActivateFunction {
    let counter = Arc::clone(counter);
    Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

pub(crate) fn count(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

/// All locks in `store` belonging to `ufid`.
pub(crate) fn locks_for(store: &LockStore, ufid: &str) -> Vec<LockEntry> {
    store
        .list_all()
        .unwrap()
        .into_iter()
        .filter(|entry| entry.ufid == ufid)
        .collect()
}
