//! Foundation types for Dock.
//!
//! This crate provides the data model shared by every other Dock crate: the
//! wave manifest, the dispatch request sent to the backend, the return
//! history records, and the scan lanes.
//!
//! # Key Types
//!
//! - [`ManifestItem`] / [`Manifest`]: Expected shipment lines for one wave
//! - [`DispatchRequest`] / [`Logistics`]: Payload for `POST /submit`
//! - [`ReturnRecord`]: Append-only history entry for an accepted return
//! - [`Lane`] / [`ScanEvent`]: Scan intake channels
//! - [`ErrorKind`]: User-facing error taxonomy shared by all crates

pub mod dispatch;
pub mod error;
pub mod manifest;
pub mod returns;
pub mod scan;

mod loose;

pub use dispatch::{DispatchRequest, Logistics, ICE_PER_COOLER};
pub use error::{ErrorKind, TypeError};
pub use manifest::{Manifest, ManifestItem, CANCELED_GATE, UNKNOWN_GATE};
pub use returns::{
    EquipmentReturnRequest, ReturnRecord, ReturnRequest, ReturnResponse,
};
pub use scan::{Lane, ScanEvent};
