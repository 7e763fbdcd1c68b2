use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScanConfigError;

pub const DEFAULT_MIN_LEN: usize = 6;
pub const DEFAULT_MANUAL_GAP_MS: u64 = 100;
pub const DEFAULT_MANUAL_MAX_GROWTH: usize = 3;
pub const DEFAULT_DEBOUNCE_MS: u64 = 800;
pub const DEFAULT_COOLDOWN_MS: u64 = 300;

/// Tuning for scan classification and intake timing.
///
/// The manual-vs-scanner heuristic is fuzzy by nature; every threshold is
/// exposed here so sites with slower scanners can adjust it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Buffers shorter than this (in characters) are ignored.
    pub min_len: usize,
    /// Keystrokes closer together than this may be manual typing.
    pub manual_gap_ms: u64,
    /// Largest per-update growth still considered manual typing.
    pub manual_max_growth: usize,
    /// Quiet period after the last update before a scanner burst is committed.
    pub debounce_ms: u64,
    /// Quiet period after a submission resolves before the next is accepted.
    pub cooldown_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_LEN,
            manual_gap_ms: DEFAULT_MANUAL_GAP_MS,
            manual_max_growth: DEFAULT_MANUAL_MAX_GROWTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

impl ScanConfig {
    pub fn manual_gap(&self) -> Duration {
        Duration::from_millis(self.manual_gap_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn validate(&self) -> Result<(), ScanConfigError> {
        if self.min_len == 0 {
            return Err(ScanConfigError::ZeroMinLength);
        }
        if self.debounce_ms == 0 {
            return Err(ScanConfigError::ZeroDebounce);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ScanConfig::default();
        assert_eq!(c.min_len, 6);
        assert_eq!(c.manual_gap(), Duration::from_millis(100));
        assert_eq!(c.manual_max_growth, 3);
        assert_eq!(c.debounce(), Duration::from_millis(800));
        assert_eq!(c.cooldown(), Duration::from_millis(300));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c: ScanConfig = toml::from_str("debounce_ms = 500\nmin_len = 8\n").unwrap();
        assert_eq!(c.debounce_ms, 500);
        assert_eq!(c.min_len, 8);
        assert_eq!(c.cooldown_ms, DEFAULT_COOLDOWN_MS);
    }

    #[test]
    fn rejects_degenerate_values() {
        let c = ScanConfig {
            min_len: 0,
            ..Default::default()
        };
        assert_eq!(c.validate(), Err(ScanConfigError::ZeroMinLength));

        let c = ScanConfig {
            debounce_ms: 0,
            ..Default::default()
        };
        assert_eq!(c.validate(), Err(ScanConfigError::ZeroDebounce));
    }
}
