use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::TypeError;

/// One of the two scan intake channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
    /// Regular returns.
    Return,
    /// Damage reports.
    Damage,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Return, Lane::Damage];

    /// Whether submissions from this lane are flagged as damaged.
    pub fn is_damaged(&self) -> bool {
        matches!(self, Self::Damage)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Return => "return",
            Self::Damage => "damage",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "return" => Ok(Self::Return),
            "damage" => Ok(Self::Damage),
            other => Err(TypeError::UnknownLane(other.to_string())),
        }
    }
}

/// A snapshot of a lane's input buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanEvent {
    pub raw: String,
    pub timestamp: Instant,
    pub lane: Lane,
}

impl ScanEvent {
    pub fn new(lane: Lane, raw: impl Into<String>, timestamp: Instant) -> Self {
        Self {
            raw: raw.into(),
            timestamp,
            lane,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_lane_flags_damage() {
        assert!(Lane::Damage.is_damaged());
        assert!(!Lane::Return.is_damaged());
    }

    #[test]
    fn parse_lane() {
        assert_eq!("return".parse::<Lane>().unwrap(), Lane::Return);
        assert_eq!(" Damage ".parse::<Lane>().unwrap(), Lane::Damage);
        assert_eq!(
            "dock".parse::<Lane>(),
            Err(TypeError::UnknownLane("dock".into()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for lane in Lane::ALL {
            assert_eq!(lane.to_string().parse::<Lane>().unwrap(), lane);
        }
    }
}
