//! Ufid to callback registry.
//!
//! Registrations live in memory only. After a restart the lock directory may
//! still hold occurrences for a ufid that nobody has registered yet; the tick
//! loop consumes those and reports them as unknown.

use crate::error::{CronError, Result};
use crate::locks::validate_ufid;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A callback fired when an occurrence of its ufid is claimed.
pub type ActivateFunction = Arc<dyn Fn() + Send + Sync + 'static>;

/// Map from ufid to its single activate function.
#[derive(Default)]
pub struct ScheduleRegistry {
    functions: RwLock<HashMap<String, ActivateFunction>>,
}

impl ScheduleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `ufid`.
    ///
    /// Fails with `DuplicateUfid` if the ufid is taken; the earlier function stays in place.
    pub fn register(&self, ufid: &str, function: ActivateFunction) -> Result<()> {
        validate_ufid(ufid)?;

        let mut functions = self
            .functions
            .write()
            .unwrap_or_else(|poison| poison.into_inner());
        if functions.contains_key(ufid) {
            return Err(CronError::DuplicateUfid(ufid.to_string()));
        }
        functions.insert(ufid.to_string(), function);
        Ok(())
    }

    /// Look up the function registered under `ufid`.
    pub fn resolve(&self, ufid: &str) -> Result<ActivateFunction> {
        self.functions
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .get(ufid)
            .cloned()
            .ok_or_else(|| CronError::UnknownUfid(ufid.to_string()))
    }

    pub fn contains(&self, ufid: &str) -> bool {
        self.functions
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .contains_key(ufid)
    }

    /// Registered ufids, sorted.
    pub fn ufids(&self) -> Vec<String> {
        let mut ufids: Vec<String> = self
            .functions
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
            .keys()
            .cloned()
            .collect();
        ufids.sort();
        ufids
    }
}

impl std::fmt::Debug for ScheduleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleRegistry")
            .field("ufids", &self.ufids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>, step: usize) -> ActivateFunction {
        let counter = Arc::clone(counter);
        Arc::new(move || {
            counter.fetch_add(step, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = ScheduleRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry.register("logCurrentDate", counting(&counter, 1)).unwrap();

        let function = registry.resolve("logCurrentDate").unwrap();
        function();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(registry.contains("logCurrentDate"));
    }

    #[test]
    fn test_duplicate_keeps_first_function() {
        let registry = ScheduleRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry.register("a", counting(&counter, 1)).unwrap();

        let err = registry.register("a", counting(&counter, 100)).unwrap_err();
        assert!(matches!(err, CronError::DuplicateUfid(ref u) if u == "a"));

        registry.resolve("a").unwrap()();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ScheduleRegistry::new();
        let err = registry.resolve("missing").err().unwrap();
        assert!(matches!(err, CronError::UnknownUfid(ref u) if u == "missing"));
    }

    #[test]
    fn test_register_rejects_separator() {
        let registry = ScheduleRegistry::new();
        let err = registry.register("log-date", Arc::new(|| {})).unwrap_err();
        assert!(matches!(err, CronError::InvalidUfid(_)));
        assert!(registry.ufids().is_empty());
    }

    #[test]
    fn test_ufids_sorted() {
        let registry = ScheduleRegistry::new();
        registry.register("b", Arc::new(|| {})).unwrap();
        registry.register("a", Arc::new(|| {})).unwrap();
        assert_eq!(registry.ufids(), vec!["a".to_string(), "b".to_string()]);
    }
}
