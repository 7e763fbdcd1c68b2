//! Cooler and ice accounting for Dock.
//!
//! Equipment moves in two unrelated flows. Outbound, coolers ride along
//! with a dispatch as [`Logistics`], where ice is always derived from the
//! cooler count. Inbound, a driver hands equipment back through the
//! [`EquipmentLedger`], independently of any manifest or scan.

pub mod error;
pub mod ledger;

pub use dock_types::{Logistics, ICE_PER_COOLER};
pub use error::{EquipmentError, EquipmentResult};
pub use ledger::{EquipmentLedger, EquipmentReturn};
