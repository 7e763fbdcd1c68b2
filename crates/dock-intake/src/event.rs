use std::fmt;

use dock_types::{Lane, ReturnRecord};

use crate::error::IntakeResult;

/// Why a scan was dropped without a network call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing left after trimming.
    Empty,
    /// Another submission is in flight or cooling down, or this barcode
    /// armed the current cooldown.
    CoolingDown,
    /// The barcode already has an unreleased submission.
    InFlight,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::CoolingDown => write!(f, "cooling down"),
            Self::InFlight => write!(f, "in flight"),
        }
    }
}

/// Result of one `submit_scan` call that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Recorded(ReturnRecord),
    Skipped(SkipReason),
}

impl SubmitOutcome {
    pub fn record(&self) -> Option<&ReturnRecord> {
        match self {
            Self::Recorded(record) => Some(record),
            Self::Skipped(_) => None,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}

/// Published for every non-empty submission attempt, including those
/// triggered by a debounce timer that nobody awaits.
#[derive(Clone, Debug)]
pub struct IntakeEvent {
    pub lane: Lane,
    pub barcode: String,
    pub result: IntakeResult<SubmitOutcome>,
}
