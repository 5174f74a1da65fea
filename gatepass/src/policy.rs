// src/policy.rs

//! Re-entry throttling: one accepted entry per identity per `threshold`.

use chrono::{NaiveDateTime, TimeDelta};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReentryPolicy {
    threshold: Duration,
}

impl ReentryPolicy {
    /// Sub-second parts of `threshold` are ignored.
    pub fn new(threshold: Duration) -> Self {
        Self { threshold: Duration::from_secs(threshold.as_secs()) }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    fn threshold_delta(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.threshold.as_secs().min(i64::MAX as u64) as i64)
            .unwrap_or_else(TimeDelta::max_value)
    }

    /// `true` with no prior entry, or once `now - last >= threshold`.
    /// A clock that went backwards (`now < last`) never permits entry.
    pub fn may_enter(&self, last: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
        match last {
            None => true,
            Some(last) => now.signed_duration_since(last).num_seconds()
                >= self.threshold_delta().num_seconds(),
        }
    }

    /// First instant at which a subject last seen at `last` may enter again.
    pub fn allowed_at(&self, last: NaiveDateTime) -> Option<NaiveDateTime> {
        last.checked_add_signed(self.threshold_delta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(8, 0, 0).unwrap()
    }

    fn secs(n: i64) -> TimeDelta {
        TimeDelta::seconds(n)
    }

    #[test]
    fn first_entry_is_always_allowed() {
        let p = ReentryPolicy::new(Duration::from_secs(20 * 3600));
        assert!(p.may_enter(None, t0()));
    }

    #[test]
    fn boundary_is_inclusive() {
        let p = ReentryPolicy::new(Duration::from_secs(30));
        assert!(!p.may_enter(Some(t0()), t0() + secs(29)));
        assert!(p.may_enter(Some(t0()), t0() + secs(30)));
        assert!(p.may_enter(Some(t0()), t0() + secs(31)));
    }

    #[test]
    fn same_second_is_denied_for_nonzero_threshold() {
        let p = ReentryPolicy::new(Duration::from_secs(1));
        assert!(!p.may_enter(Some(t0()), t0()));
    }

    #[test]
    fn zero_threshold_allows_immediately() {
        let p = ReentryPolicy::new(Duration::ZERO);
        assert!(p.may_enter(Some(t0()), t0()));
    }

    #[test]
    fn clock_skew_backwards_denies() {
        let p = ReentryPolicy::new(Duration::ZERO);
        assert!(!p.may_enter(Some(t0()), t0() - secs(5)));
    }

    #[test]
    fn subsecond_threshold_is_truncated() {
        let p = ReentryPolicy::new(Duration::from_millis(30_900));
        assert_eq!(p.threshold(), Duration::from_secs(30));
        assert!(p.may_enter(Some(t0()), t0() + secs(30)));
    }

    #[test]
    fn allowed_at_adds_threshold() {
        let p = ReentryPolicy::new(Duration::from_secs(20 * 3600));
        assert_eq!(p.allowed_at(t0()), Some(t0() + secs(20 * 3600)));
    }
}
