//! Tick engine: the polling loop that fires due lock entries.
//!
//! Each tick samples the clock, loads the lock directory, and fires every
//! entry whose execute timestamp falls in the tick's due window. Firing an
//! entry means:
//! 1. delete its lock file (losing this race means someone else fired it),
//! 2. write the next occurrence for interval locks,
//! 3. invoke the registered callback.
//!
//! The first tick after start only records the clock. The first tick after
//! that moves interval locks that went stale while nothing was ticking (for
//! example across a restart) into the future without firing them.

mod report;
mod window;


pub use report::TickReport;
pub use window::{DueWindow, next_after, reconciled_timestamp};

use crate::clock::Clock;
use crate::error::{CronError, Result};
use crate::events::{Event, EventAction, EventJournal};
use crate::locks::{LockEntry, LockStore};
use crate::registry::ScheduleRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread;
use std::time::Duration;

/// Polling state carried from one tick to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickState {
    pub previous_timestamp: i64,
    pub current_timestamp: i64,
    /// Stale interval locks have been reconciled for this engine.
    pub reconciled: bool,
}

/// The polling loop and its state.
pub struct TickEngine {
    store: LockStore,
    registry: Arc<ScheduleRegistry>,
    clock: Arc<dyn Clock>,
    journal: EventJournal,
    period: Duration,
    spawn_loop: bool,
    running: AtomicBool,
    state: Mutex<TickState>,
}

impl TickEngine {
    /// Create a stopped engine.
    ///
    /// With `spawn_loop` unset, `ensure_running` only flips the running flag
    /// and ticks happen solely through explicit `tick` calls.
    pub fn new(
        store: LockStore,
        registry: Arc<ScheduleRegistry>,
        clock: Arc<dyn Clock>,
        journal: EventJournal,
        period: Duration,
        spawn_loop: bool,
    ) -> Self {
        Self {
            store,
            registry,
            clock,
            journal,
            period,
            spawn_loop,
            running: AtomicBool::new(false),
            state: Mutex::new(TickState::default()),
        }
    }

    pub fn period_ms(&self) -> i64 {
        i64::try_from(self.period.as_millis()).unwrap_or(i64::MAX)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the polling state.
    pub fn state(&self) -> TickState {
        *self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    /// Start the loop unless it is already running.
    ///
    /// Returns `true` only for the call that started it. The loop thread holds
    /// a weak reference and exits once the engine is dropped.
    pub fn ensure_running(self: &Arc<Self>) -> bool {
        if self.running.swap(true, Ordering::SeqCst) {
            return false;
        }

        if !self.spawn_loop {
            tracing::debug!("tick loop marked running; ticks are driven manually");
            return true;
        }

        let engine = Arc::downgrade(self);
        let period = self.period;
        let spawned = thread::Builder::new()
            .name("lockcron-tick".to_string())
            .spawn(move || run_loop(engine, period));

        match spawned {
            Ok(_) => {
                tracing::info!(
                    dir = %self.store.dir().display(),
                    period_secs = period.as_secs(),
                    "tick loop started"
                );
                true
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                tracing::error!(error = %e, "failed to spawn tick loop thread");
                false
            }
        }
    }

    /// Run one tick.
    ///
    /// Ticks are serialized. Callbacks run while the tick is in progress, so a
    /// callback must not call `tick` itself.
    pub fn tick(&self) -> Result<TickReport> {
        let mut state = self.state.lock().unwrap_or_else(|poison| poison.into_inner());
        state.previous_timestamp = state.current_timestamp;
        state.current_timestamp = self.clock.now_ms();

        if state.previous_timestamp == 0 {
            tracing::debug!(now = state.current_timestamp, "cold tick; sampling clock only");
            return Ok(TickReport::cold());
        }

        let entries = self.store.list_all()?;
        let mut report = TickReport::default();
        let period_ms = self.period_ms();

        if !state.reconciled {
            state.reconciled = true;
            self.reconcile_stale(&state, &entries, &mut report);
        }

        let window =
            DueWindow::for_tick(state.previous_timestamp, state.current_timestamp, period_ms);
        for entry in entries.iter().filter(|e| window.contains(e.execute_timestamp)) {
            self.fire(entry, &window, &mut report);
        }

        Ok(report)
    }

    /// Move interval locks that were due before this engine started ticking.
    fn reconcile_stale(&self, state: &TickState, entries: &[LockEntry], report: &mut TickReport) {
        let period_ms = self.period_ms();
        let stale_before = state.previous_timestamp.saturating_add(period_ms);

        for entry in entries {
            let Some(interval) = entry.interval_timestamp else {
                continue;
            };
            if entry.execute_timestamp >= stale_before {
                continue;
            }

            match self.store.delete(entry) {
                Ok(()) => {}
                Err(CronError::LockAlreadyClaimed(_)) => {
                    tracing::debug!(lock = %entry, "stale lock already reconciled elsewhere");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        lock = %entry,
                        error = %e,
                        "failed to remove stale interval lock"
                    );
                    report.delete_failures += 1;
                    continue;
                }
            }

            let next = entry.rescheduled(reconciled_timestamp(
                entry.execute_timestamp,
                interval,
                state.current_timestamp,
                period_ms,
            ));

            match self.store.create(&next) {
                Ok(()) => {
                    tracing::info!(
                        ufid = %entry.ufid,
                        stale = entry.execute_timestamp,
                        next = next.execute_timestamp,
                        "rescheduled stale interval lock"
                    );
                    self.journal.record(
                        Event::for_lock(EventAction::Reconciled, &next)
                            .with_detail("stale_timestamp", entry.execute_timestamp),
                    );
                    report.reconciled.push(next);
                }
                Err(e) => self.report_create_failure(&next, &e, report),
            }
        }
    }

    /// Claim, re-arm and invoke one due entry.
    fn fire(&self, entry: &LockEntry, window: &DueWindow, report: &mut TickReport) {
        match self.store.delete(entry) {
            Ok(()) => {}
            Err(CronError::LockAlreadyClaimed(_)) => {
                tracing::debug!(lock = %entry, "occurrence claimed by another tick or process");
                self.journal.record(Event::for_lock(EventAction::ClaimLost, entry));
                report.claimed_elsewhere += 1;
                return;
            }
            Err(e) => {
                tracing::warn!(lock = %entry, error = %e, "failed to claim due lock");
                report.delete_failures += 1;
                return;
            }
        }

        // Re-arm before invoking so a slow callback cannot lose the next occurrence.
        if let Some(interval) = entry.interval_timestamp {
            let next = entry.rescheduled(next_after(entry.execute_timestamp, interval, window.to));
            match self.store.create(&next) {
                Ok(()) => {
                    self.journal.record(Event::for_lock(EventAction::Rearmed, &next));
                    report.rearmed.push(next);
                }
                Err(e) => self.report_create_failure(&next, &e, report),
            }
        }

        let function = match self.registry.resolve(&entry.ufid) {
            Ok(function) => function,
            Err(e) => {
                tracing::warn!(
                    lock = %entry,
                    error = %e,
                    "claimed occurrence has no activate function"
                );
                self.journal.record(Event::for_lock(EventAction::UnknownUfid, entry));
                report.unknown_ufids.push(entry.ufid.clone());
                return;
            }
        };

        tracing::info!(ufid = %entry.ufid, execute_timestamp = entry.execute_timestamp, "firing");
        self.journal.record(Event::for_lock(EventAction::Fired, entry));
        report.fired.push(entry.clone());
        function();
    }

    fn report_create_failure(
        &self,
        entry: &LockEntry,
        error: &CronError,
        report: &mut TickReport,
    ) {
        tracing::warn!(
            lock = %entry,
            error = %error,
            "failed to write lock; occurrence not persisted"
        );
        let event = Event::for_lock(EventAction::CreateFailed, entry)
            .with_detail("error", error.to_string());
        self.journal.record(event);
        report.create_failures += 1;
    }
}

impl std::fmt::Debug for TickEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickEngine")
            .field("dir", &self.store.dir())
            .field("period", &self.period)
            .field("running", &self.is_running())
            .field("state", &self.state.try_lock().ok().map(|state| *state))
            .finish()
    }
}

fn run_loop(engine: Weak<TickEngine>, period: Duration) {
    loop {
        thread::sleep(period);
        let Some(engine) = engine.upgrade() else {
            tracing::debug!("scheduler dropped; tick loop exiting");
            break;
        };
        if let Err(e) = engine.tick() {
            tracing::error!(error = %e, "tick failed");
        }
    }
}
