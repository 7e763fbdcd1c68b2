//! Scan classification for Dock.
//!
//! Barcode scanners behave like keyboards: they "type" the whole code in a
//! burst and usually finish with Enter. Operators also type codes by hand.
//! The [`ScanClassifier`] watches successive snapshots of a lane's input
//! buffer and decides whether the buffer should be committed automatically
//! after a quiet period, or only when the operator presses Enter.
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use dock_scan::{ScanClassifier, ScanConfig, ScanDecision};
//!
//! let mut classifier = ScanClassifier::new(ScanConfig::default());
//! let decision = classifier.observe("998877", Instant::now());
//! assert_eq!(decision, ScanDecision::ScheduleAutoCommit(Duration::from_millis(800)));
//! ```

pub mod classifier;
pub mod config;
pub mod error;

pub use classifier::{classify, ScanClassifier, ScanDecision};
pub use config::ScanConfig;
pub use error::ScanConfigError;
