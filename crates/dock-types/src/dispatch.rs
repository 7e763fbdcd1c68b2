use serde::Serialize;

use crate::manifest::ManifestItem;

/// Bags of ice packed per cooler on a dispatch.
pub const ICE_PER_COOLER: u64 = 4;

/// Equipment sent with a dispatch.
///
/// Ice is always derived from the cooler count; there is no way to set it
/// independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Logistics {
    coolers: u32,
    ice: u64,
}

impl Logistics {
    pub fn for_coolers(coolers: u32) -> Self {
        Self {
            coolers,
            ice: u64::from(coolers) * ICE_PER_COOLER,
        }
    }

    pub fn coolers(&self) -> u32 {
        self.coolers
    }

    pub fn ice(&self) -> u64 {
        self.ice
    }
}

/// Body of `POST /submit`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub wave_number: String,
    pub vehicle_number: String,
    pub driver_name: String,
    pub username: String,
    pub assets: Vec<ManifestItem>,
    pub logistics: Logistics,
}
