use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::loose;

/// Body of `POST /return`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub barcode: String,
    pub username: String,
    pub is_damaged: bool,
}

/// Successful response of `POST /return`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResponse {
    #[serde(deserialize_with = "loose::string")]
    pub barcode: String,
    /// Driver the package was last dispatched with, resolved by the server.
    #[serde(default)]
    pub returned_from_driver: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub is_damaged: bool,
}

/// One accepted return, as kept in the session history.
///
/// Records are created only from a successful server response and are never
/// edited afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub barcode: String,
    pub driver_name: Option<String>,
    pub city: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_damaged: bool,
}

impl ReturnRecord {
    pub fn from_response(response: ReturnResponse, timestamp: DateTime<Utc>) -> Self {
        Self {
            barcode: response.barcode,
            driver_name: response.returned_from_driver,
            city: response.city,
            timestamp,
            is_damaged: response.is_damaged,
        }
    }
}

/// Body of `POST /return-equipment`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentReturnRequest {
    pub driver_name: String,
    pub coolers: u32,
    pub ice: u64,
    pub username: String,
}
