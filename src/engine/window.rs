//! Due-window and reconciliation arithmetic.
//!
//! All values are epoch milliseconds. These functions are pure so the tick
//! loop's firing rules can be checked without touching the filesystem.

/// The range of execute timestamps a tick fires: `(from, to]`.
///
/// For consecutive ticks sampled at `t0 < t1 < t2` the windows are
/// `(t0 + P, t1 + P]` and `(t1 + P, t2 + P]`, so every timestamp lands in
/// exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    pub from: i64,
    pub to: i64,
}

impl DueWindow {
    /// Window for a tick sampled at `current` whose previous tick was at `previous`.
    pub fn for_tick(previous: i64, current: i64, period_ms: i64) -> Self {
        Self {
            from: previous.saturating_add(period_ms),
            to: current.saturating_add(period_ms),
        }
    }

    pub fn contains(&self, execute_timestamp: i64) -> bool {
        self.from < execute_timestamp && execute_timestamp <= self.to
    }
}

/// Next execute timestamp for an interval lock that went stale while no
/// process was ticking.
///
/// Skips every occurrence up to `current`, then one more if the result would
/// still fall inside the current tick's window. The result is always strictly
/// greater than `current + period_ms`.
pub fn reconciled_timestamp(execute: i64, interval: i64, current: i64, period_ms: i64) -> i64 {
    let missed = current.saturating_sub(execute).div_euclid(interval);
    let last_missed = execute.saturating_add(missed.saturating_mul(interval));
    next_after(last_missed, interval, current.saturating_add(period_ms))
}

/// Execute timestamp of the occurrence re-armed after firing at `execute`.
///
/// Normally `execute + interval`. If that is still inside the firing tick's
/// window (`<= horizon`) it could never become due again, so occurrences are
/// skipped until one lies beyond the window. This only happens when the gap
/// between two ticks exceeds the interval.
pub fn next_after(execute: i64, interval: i64, horizon: i64) -> i64 {
    let mut next = execute.saturating_add(interval);
    while next <= horizon && next < i64::MAX {
        next = next.saturating_add(interval);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const P: i64 = 30_000;

    #[test]
    fn test_window_bounds() {
        let window = DueWindow::for_tick(1_000_000, 1_030_000, P);
        assert!(!window.contains(1_030_000));
        assert!(window.contains(1_030_001));
        assert!(window.contains(1_060_000));
        assert!(!window.contains(1_060_001));
    }

    #[test]
    fn test_next_after() {
        assert_eq!(next_after(90_000, 60_000, 120_000), 150_000);
        // Tick gap longer than the interval: skip past the window.
        assert_eq!(next_after(90_000, 60_000, 200_000), 270_000);
        assert_eq!(next_after(90_000, 60_000, 150_000), 210_000);
    }

    #[test]
    fn test_reconcile_far_past() {
        // Lock due at 0 every minute, process resumes at 10m05s.
        let current = 605_000;
        let next = reconciled_timestamp(0, 60_000, current, P);
        assert_eq!(next, 660_000);
    }

    #[test]
    fn test_reconcile_bumps_inside_current_window() {
        // The first candidate (620s) is within current + P (625s), so skip one more.
        let current = 595_000;
        let next = reconciled_timestamp(20_000, 60_000, current, P);
        assert_eq!(next, 680_000);
    }

    #[test]
    fn test_reconcile_boundary_is_bumped() {
        // Candidate equal to current + P would belong to this tick's window.
        let next = reconciled_timestamp(0, 60_000, 30_000, P);
        assert_eq!(next, 120_000);
    }

    #[test]
    fn test_reconcile_short_interval_clears_window() {
        // A one minute interval with a longer tick period still lands past the window.
        let next = reconciled_timestamp(0, 60_000, 1_000_000, 120_000);
        assert!(next > 1_120_000);
        assert_eq!(next % 60_000, 0);
    }

    proptest! {
        #[test]
        fn prop_windows_partition_the_timeline(
            start in 1i64..1_000_000_000,
            gaps in proptest::collection::vec(1i64..120_000, 2..40),
            probe in 1i64..5_000_000,
        ) {
            let mut samples = vec![start];
            for gap in &gaps {
                let last = *samples.last().unwrap();
                samples.push(last + gap);
            }
            let t = samples[0] + P + probe;
            prop_assume!(t <= *samples.last().unwrap() + P);

            let hits = samples
                .windows(2)
                .filter(|pair| DueWindow::for_tick(pair[0], pair[1], P).contains(t))
                .count();
            prop_assert_eq!(hits, 1);
        }

        #[test]
        fn prop_reconciled_is_future_and_aligned(
            execute in 0i64..1_000_000_000,
            interval_minutes in 1i64..2_000,
            lag in 0i64..100_000_000,
        ) {
            let interval = interval_minutes * 60_000;
            let current = execute + lag;
            let next = reconciled_timestamp(execute, interval, current, P);

            prop_assert!(next > current + P);
            prop_assert_eq!((next - execute) % interval, 0);
            // The occurrence before it was not past the window.
            prop_assert!(next - interval <= current + P);
        }
    }
}
