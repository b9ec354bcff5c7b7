//! Scheduling API: the `Cron` facade collaborators use.
//!
//! A `Cron` binds a lock directory, a callback registry and a tick engine.
//! Collaborators register activate functions by ufid, then create and remove
//! schedules; the tick engine fires them.
//!
//! ```no_run
//! use lockcron::config::Config;
//! use lockcron::schedule::{Cron, IntervalSpec, ScheduleRequest};
//!
//! let cron = Cron::open(&Config::default())?;
//! cron.add_ufid_activate_function("logCurrentDate", || println!("tick"))?;
//! cron.create_schedule(ScheduleRequest::interval("logCurrentDate", IntervalSpec::minutes(1)))?;
//! cron.create_schedule(ScheduleRequest::term("logCurrentDate", "2024-02-19T23:46:50"))?;
//! # Ok::<(), lockcron::error::CronError>(())
//! ```
//!
//! Instances are independent: two `Cron`s on one directory coordinate only
//! through the lock files, exactly like two processes would.

mod dates;
mod request;


pub use dates::parse_execute_date;
pub use request::{IntervalSpec, ScheduleRequest, TimeUnit};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::engine::{TickEngine, TickReport, reconciled_timestamp};
use crate::error::{CronError, Result};
use crate::events::{Event, EventAction, EventJournal};
use crate::locks::{LockEntry, LockStore, validate_ufid};
use crate::registry::ScheduleRegistry;
use std::path::Path;
use std::sync::Arc;
use std::thread;

/// Handle to a scheduler. Clones share the same registry and tick loop.
#[derive(Debug, Clone)]
pub struct Cron {
    inner: Arc<CronInner>,
}

#[derive(Debug)]
struct CronInner {
    store: LockStore,
    registry: Arc<ScheduleRegistry>,
    engine: Arc<TickEngine>,
    clock: Arc<dyn Clock>,
    journal: EventJournal,
    default_lead_ms: i64,
}

/// Builder for `Cron` when the defaults of `Cron::open` do not fit.
pub struct CronBuilder {
    config: Config,
    clock: Arc<dyn Clock>,
    spawn_loop: bool,
}

impl CronBuilder {
    /// Use `clock` instead of the system clock.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Do not spawn the loop thread; ticks happen only through `Cron::tick`.
    pub fn manual_ticks(mut self) -> Self {
        self.spawn_loop = false;
        self
    }

    /// Create the lock directory if needed and start ticking right away when
    /// it already holds pending work.
    pub fn build(self) -> Result<Cron> {
        self.config.validate()?;

        let store = LockStore::new(&self.config.lock_dir);
        store.ensure_dir()?;

        let registry = Arc::new(ScheduleRegistry::new());
        let journal = EventJournal::new(self.config.events_file.clone());
        let engine = Arc::new(TickEngine::new(
            store.clone(),
            Arc::clone(&registry),
            Arc::clone(&self.clock),
            journal.clone(),
            self.config.tick_period(),
            self.spawn_loop,
        ));

        let cron = Cron {
            inner: Arc::new(CronInner {
                store,
                registry,
                engine,
                clock: self.clock,
                journal,
                default_lead_ms: self.config.default_lead_ms(),
            }),
        };

        if cron.has_pending_work()? {
            cron.inner.engine.ensure_running();
        }

        Ok(cron)
    }
}

impl Cron {
    /// Open a scheduler on `config.lock_dir` using the system clock.
    pub fn open(config: &Config) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: &Config) -> CronBuilder {
        CronBuilder {
            config: config.clone(),
            clock: Arc::new(SystemClock),
            spawn_loop: true,
        }
    }

    /// Register the function fired for `ufid`.
    ///
    /// Fails with `DuplicateUfid` if `ufid` already has one.
    pub fn add_ufid_activate_function<F>(&self, ufid: &str, activate_function: F) -> Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.registry.register(ufid, Arc::new(activate_function))
    }

    /// Persist a schedule and make sure the tick loop is running.
    ///
    /// Validation failures (`InvalidUfid`, `InvalidDate`, `InvalidTimeUnit`,
    /// `InvalidInterval`, `IntervalAlreadyExists`, `TermAlreadyExists`) return
    /// before anything is written. A failure to write the lock file itself is
    /// logged and journaled but not returned.
    ///
    /// An interval whose first fire is already out of reach of every future
    /// tick starts at its next reachable occurrence instead.
    pub fn create_schedule(&self, request: ScheduleRequest) -> Result<LockEntry> {
        validate_ufid(&request.ufid)?;
        let execute_timestamp = request
            .execute_date
            .as_deref()
            .map(parse_execute_date)
            .transpose()?;

        let entry = match &request.interval {
            Some(interval) => {
                let interval_timestamp = interval.to_millis()?;
                let requested = match execute_timestamp {
                    Some(ts) => ts,
                    None => self
                        .inner
                        .clock
                        .now_ms()
                        .saturating_add(self.inner.default_lead_ms),
                };
                let execute_timestamp =
                    self.first_fire(&request.ufid, requested, interval_timestamp);
                // Any lock for the ufid blocks a new interval, term locks included.
                let exists = self
                    .inner
                    .store
                    .list_all()?
                    .iter()
                    .any(|entry| entry.ufid == request.ufid);
                if exists {
                    return Err(CronError::IntervalAlreadyExists(request.ufid));
                }
                LockEntry::interval(request.ufid, execute_timestamp, interval_timestamp)
            }
            None => {
                let execute_timestamp = execute_timestamp.ok_or_else(|| {
                    CronError::InvalidDate("a term schedule requires an execute date".to_string())
                })?;
                let exists = self.inner.store.list_all()?.iter().any(|entry| {
                    entry.ufid == request.ufid && entry.execute_timestamp == execute_timestamp
                });
                if exists {
                    return Err(CronError::TermAlreadyExists {
                        ufid: request.ufid,
                        execute_timestamp,
                    });
                }
                LockEntry::term(request.ufid, execute_timestamp)
            }
        };

        self.inner.engine.ensure_running();
        self.persist(&entry);
        Ok(entry)
    }

    /// Remove a schedule.
    ///
    /// With `is_lock_interval` the ufid's interval lock is removed; otherwise
    /// the lock at `execute_date`. Returns the removed entry, or `None` when
    /// there was nothing to remove.
    pub fn remove_schedule(
        &self,
        ufid: &str,
        execute_date: Option<&str>,
        is_lock_interval: bool,
    ) -> Result<Option<LockEntry>> {
        let target = if is_lock_interval {
            self.inner.store.find_interval(ufid)?
        } else {
            match execute_date {
                Some(date) => {
                    let execute_timestamp = parse_execute_date(date)?;
                    self.inner.store.find_at(ufid, execute_timestamp)?
                }
                None => None,
            }
        };

        let Some(entry) = target else {
            tracing::debug!(ufid, "no matching schedule to remove");
            return Ok(None);
        };

        match self.inner.store.delete(&entry) {
            Ok(()) => {
                tracing::info!(lock = %entry, "schedule removed");
                self.inner
                    .journal
                    .record(Event::for_lock(EventAction::ScheduleRemove, &entry));
                Ok(Some(entry))
            }
            Err(CronError::LockAlreadyClaimed(_)) => {
                tracing::debug!(lock = %entry, "lock claimed before it could be removed");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// All decoded locks in the directory.
    pub fn pending(&self) -> Result<Vec<LockEntry>> {
        self.inner.store.list_all()
    }

    /// Run one tick on the calling thread.
    pub fn tick(&self) -> Result<TickReport> {
        self.inner.engine.tick()
    }

    pub fn is_running(&self) -> bool {
        self.inner.engine.is_running()
    }

    /// Start the loop if needed and block the calling thread for good.
    pub fn join(&self) -> ! {
        self.inner.engine.ensure_running();
        loop {
            thread::park();
        }
    }

    pub fn lock_dir(&self) -> &Path {
        self.inner.store.dir()
    }

    pub fn registry(&self) -> &ScheduleRegistry {
        &self.inner.registry
    }

    /// First fire for a new interval lock.
    ///
    /// The earliest timestamp any future tick can fire is `now + P`, exclusive.
    /// A start at or before that is moved forward along the interval grid.
    fn first_fire(&self, ufid: &str, requested: i64, interval: i64) -> i64 {
        let now = self.inner.clock.now_ms();
        let period_ms = self.inner.engine.period_ms();
        if requested > now.saturating_add(period_ms) {
            return requested;
        }

        let first = reconciled_timestamp(requested, interval, now, period_ms);
        tracing::info!(
            ufid,
            requested,
            execute_timestamp = first,
            "interval start already passed; starting at next occurrence"
        );
        first
    }

    /// Interval locks, or term locks that are still in the future.
    fn has_pending_work(&self) -> Result<bool> {
        let now = self.inner.clock.now_ms();
        Ok(self
            .inner
            .store
            .list_all()?
            .iter()
            .any(|entry| entry.is_interval() || entry.execute_timestamp > now))
    }

    fn persist(&self, entry: &LockEntry) {
        match self.inner.store.create(entry) {
            Ok(()) => {
                tracing::info!(
                    ufid = %entry.ufid,
                    kind = entry.kind().as_str(),
                    execute_timestamp = entry.execute_timestamp,
                    "schedule created"
                );
                self.inner
                    .journal
                    .record(Event::for_lock(EventAction::ScheduleCreate, entry));
            }
            Err(e) => {
                tracing::warn!(lock = %entry, error = %e, "failed to persist schedule");
                self.inner.journal.record(
                    Event::for_lock(EventAction::CreateFailed, entry)
                        .with_detail("error", e.to_string()),
                );
            }
        }
    }
}
