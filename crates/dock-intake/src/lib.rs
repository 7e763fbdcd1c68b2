//! Return and damage scan intake for Dock.
//!
//! The [`IntakeCoordinator`] turns lane input into at most one
//! `POST /return` per accepted barcode. It combines:
//!
//! - the session's return history (permanent: a returned barcode is
//!   rejected as a conflict without a network call),
//! - a shared [`CooldownState`] and [`ProcessedBarcodeRegistry`]
//!   (transient: a second trigger for the same scan, whether a debounce
//!   timer or an Enter press, is dropped while the first is in flight),
//! - optimistic marks that are rolled back when the backend call fails, so
//!   the same barcode can be retried.
//!
//! The backend stays the source of truth for duplicates; the checks here
//! only avoid redundant requests.

pub mod coordinator;
pub mod cooldown;
pub mod error;
pub mod event;

mod lane;

pub use coordinator::IntakeCoordinator;
pub use cooldown::{CooldownState, ProcessedBarcodeRegistry};
pub use error::{IntakeError, IntakeResult};
pub use event::{IntakeEvent, SkipReason, SubmitOutcome};
