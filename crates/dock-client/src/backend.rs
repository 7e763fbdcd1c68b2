use async_trait::async_trait;
use dock_types::{
    DispatchRequest, EquipmentReturnRequest, ManifestItem, ReturnRequest, ReturnResponse,
};

use crate::error::ClientResult;

/// Interface to the authoritative Dock backend.
///
/// Each method is exactly one remote call. Implementations never retry;
/// retrying is the operator's decision.
#[async_trait]
pub trait DockBackend: Send + Sync {
    /// `GET /manifest?waveNumber=N`. An unknown wave may come back as an
    /// empty list or as a non-2xx error.
    async fn fetch_manifest(&self, wave_number: &str) -> ClientResult<Vec<ManifestItem>>;

    /// `POST /submit`.
    async fn submit_dispatch(&self, request: &DispatchRequest) -> ClientResult<()>;

    /// `POST /return`.
    async fn submit_return(&self, request: &ReturnRequest) -> ClientResult<ReturnResponse>;

    /// `POST /return-equipment`.
    async fn return_equipment(&self, request: &EquipmentReturnRequest) -> ClientResult<()>;
}
