use std::time::{Duration, Instant};

use dock_types::ScanEvent;
use tracing::trace;

use crate::config::ScanConfig;

/// What to do with a lane's buffer after an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanDecision {
    /// Too short to be a barcode.
    Ignore,
    /// Looks like manual typing; only an explicit Enter may commit it.
    AwaitExplicit,
    /// Looks like a scanner burst; commit once the buffer has been quiet
    /// for the given delay. Any pending commit for the lane is restarted.
    ScheduleAutoCommit(Duration),
}

impl ScanDecision {
    pub fn is_auto_commit(&self) -> bool {
        matches!(self, Self::ScheduleAutoCommit(_))
    }
}

/// Classify one buffer update.
///
/// `elapsed` is the time since the previous update, or `None` if there was
/// none. Manual typing requires all of: a short gap, a buffer that grew by
/// at most `manual_max_growth` characters, and the new value extending the
/// previous one.
pub fn classify(
    config: &ScanConfig,
    prev_value: &str,
    elapsed: Option<Duration>,
    value: &str,
) -> ScanDecision {
    let len = value.chars().count();
    if len < config.min_len {
        return ScanDecision::Ignore;
    }

    let prev_len = prev_value.chars().count();
    let manual = elapsed.is_some_and(|dt| dt < config.manual_gap())
        && len > prev_len
        && len - prev_len <= config.manual_max_growth
        && value.starts_with(prev_value);

    if manual {
        ScanDecision::AwaitExplicit
    } else {
        ScanDecision::ScheduleAutoCommit(config.debounce())
    }
}

/// Per-lane classifier state: the previous buffer and when it changed.
#[derive(Clone, Debug)]
pub struct ScanClassifier {
    config: ScanConfig,
    prev_value: String,
    prev_change: Option<Instant>,
}

impl ScanClassifier {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            prev_value: String::new(),
            prev_change: None,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Classify `value` observed at `now`, then remember it as the previous
    /// update. The state advances on every call, ignored ones included.
    pub fn observe(&mut self, value: &str, now: Instant) -> ScanDecision {
        let elapsed = self
            .prev_change
            .map(|prev| now.saturating_duration_since(prev));
        let decision = classify(&self.config, &self.prev_value, elapsed, value);
        trace!(value, ?elapsed, ?decision, "buffer classified");

        self.prev_value.clear();
        self.prev_value.push_str(value);
        self.prev_change = Some(now);
        decision
    }

    pub fn observe_event(&mut self, event: &ScanEvent) -> ScanDecision {
        self.observe(&event.raw, event.timestamp)
    }

    /// Forget the previous update, as after the lane's buffer is cleared.
    pub fn reset(&mut self) {
        self.prev_value.clear();
        self.prev_change = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dock_types::Lane;
    use proptest::prelude::*;

    const DEBOUNCE: Duration = Duration::from_millis(800);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn classifier() -> ScanClassifier {
        ScanClassifier::new(ScanConfig::default())
    }

    #[test]
    fn short_buffers_are_ignored() {
        let mut c = classifier();
        let t0 = Instant::now();
        assert_eq!(c.observe("1", t0), ScanDecision::Ignore);
        assert_eq!(c.observe("12345", t0 + ms(500)), ScanDecision::Ignore);
    }

    #[test]
    fn single_burst_is_scanner() {
        let mut c = classifier();
        assert_eq!(
            c.observe("998877", Instant::now()),
            ScanDecision::ScheduleAutoCommit(DEBOUNCE)
        );
    }

    #[test]
    fn fast_small_growth_is_manual() {
        let mut c = classifier();
        let t0 = Instant::now();
        c.observe("12345", t0);
        assert_eq!(c.observe("123456", t0 + ms(60)), ScanDecision::AwaitExplicit);
        assert_eq!(c.observe("1234567", t0 + ms(120)), ScanDecision::AwaitExplicit);
    }

    #[test]
    fn large_jump_after_manual_steps_is_scanner() {
        let mut c = classifier();
        let t0 = Instant::now();
        assert_eq!(c.observe("12", t0), ScanDecision::Ignore);
        assert_eq!(c.observe("123", t0 + ms(40)), ScanDecision::Ignore);
        assert_eq!(
            c.observe("1234567", t0 + ms(80)),
            ScanDecision::ScheduleAutoCommit(DEBOUNCE)
        );
    }

    #[test]
    fn slow_growth_is_scanner() {
        let mut c = classifier();
        let t0 = Instant::now();
        c.observe("12345", t0);
        assert!(c.observe("123456", t0 + ms(100)).is_auto_commit());
    }

    #[test]
    fn shrinking_or_diverging_is_scanner() {
        let mut c = classifier();
        let t0 = Instant::now();
        c.observe("1234567", t0);
        assert!(c.observe("123456", t0 + ms(10)).is_auto_commit());
        assert!(c.observe("654321x", t0 + ms(20)).is_auto_commit());
    }

    #[test]
    fn unchanged_value_is_scanner() {
        let mut c = classifier();
        let t0 = Instant::now();
        c.observe("123456", t0);
        assert!(c.observe("123456", t0 + ms(10)).is_auto_commit());
    }

    #[test]
    fn reset_forgets_previous_update() {
        let mut c = classifier();
        let t0 = Instant::now();
        c.observe("12345", t0);
        c.reset();
        assert!(c.observe("123456", t0 + ms(10)).is_auto_commit());
    }

    #[test]
    fn tuned_thresholds_apply() {
        let config = ScanConfig {
            min_len: 4,
            manual_max_growth: 1,
            debounce_ms: 250,
            ..Default::default()
        };
        let mut c = ScanClassifier::new(config);
        let t0 = Instant::now();
        c.observe("12", t0);
        assert_eq!(
            c.observe("1234", t0 + ms(10)),
            ScanDecision::ScheduleAutoCommit(ms(250))
        );
        assert_eq!(c.observe("12345", t0 + ms(20)), ScanDecision::AwaitExplicit);
    }

    #[test]
    fn observe_event_uses_event_fields() {
        let mut c = classifier();
        let event = ScanEvent::new(Lane::Damage, "44556677", Instant::now());
        assert!(c.observe_event(&event).is_auto_commit());
    }

    proptest! {
        #[test]
        fn below_min_len_always_ignored(prev in "[0-9]{0,12}", value in "[0-9]{0,5}", gap in 0u64..2000) {
            let d = classify(&ScanConfig::default(), &prev, Some(ms(gap)), &value);
            prop_assert_eq!(d, ScanDecision::Ignore);
        }

        #[test]
        fn first_long_update_is_scanner(value in "[0-9A-Z]{6,24}") {
            let d = classify(&ScanConfig::default(), "", None, &value);
            prop_assert_eq!(d, ScanDecision::ScheduleAutoCommit(DEBOUNCE));
        }

        #[test]
        fn manual_only_when_extending_prefix(prev in "[0-9]{3,10}", suffix in "[0-9]{1,3}", gap in 0u64..100) {
            let value = format!("{prev}{suffix}");
            prop_assume!(value.len() >= 6);
            let d = classify(&ScanConfig::default(), &prev, Some(ms(gap)), &value);
            prop_assert_eq!(d, ScanDecision::AwaitExplicit);
        }
    }
}
