use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use dock_types::{
    DispatchRequest, EquipmentReturnRequest, ManifestItem, ReturnRequest, ReturnResponse,
};

use crate::backend::DockBackend;
use crate::endpoint::Endpoint;
use crate::error::{ClientError, ClientResult};

/// A scripted failure for the next call to an endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// The request never reaches the server.
    Network(String),
    /// The server answers with a non-2xx status and an optional `message`.
    Status(u16, Option<String>),
}

impl From<Failure> for ClientError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Network(reason) => ClientError::Network(reason),
            Failure::Status(status, message) => ClientError::Server { status, message },
        }
    }
}

/// In-memory Dock backend for tests, local demos, and offline use.
///
/// Behaves like the authoritative server: it rejects a barcode that has
/// already been returned, resolves the driver and city of a return from the
/// dispatch history, and records every request it accepts.
#[derive(Default)]
pub struct InMemoryBackend {
    latency: Duration,
    inner: Mutex<BackendState>,
}

#[derive(Default)]
struct BackendState {
    manifests: HashMap<String, Vec<ManifestItem>>,
    origins: HashMap<String, (String, Option<String>)>,
    returned: HashSet<String>,
    failures: HashMap<Endpoint, VecDeque<Failure>>,
    calls: HashMap<Endpoint, usize>,
    dispatches: Vec<DispatchRequest>,
    returns: Vec<ReturnRequest>,
    equipment: Vec<EquipmentReturnRequest>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency` (uses the tokio clock).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_manifest(self, wave_number: impl Into<String>, items: Vec<ManifestItem>) -> Self {
        self.state().manifests.insert(wave_number.into(), items);
        self
    }

    /// Register the driver (and city) a barcode was dispatched with.
    pub fn with_origin(
        self,
        barcode: impl Into<String>,
        driver: impl Into<String>,
        city: Option<&str>,
    ) -> Self {
        self.state()
            .origins
            .insert(barcode.into(), (driver.into(), city.map(str::to_string)));
        self
    }

    /// Fail the next call to `endpoint`. Failures queue in order.
    pub fn fail_next(&self, endpoint: Endpoint, failure: Failure) {
        self.state()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(failure);
    }

    /// Number of calls received on `endpoint`, including failed ones.
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.state().calls.get(&endpoint).copied().unwrap_or(0)
    }

    pub fn dispatches(&self) -> Vec<DispatchRequest> {
        self.state().dispatches.clone()
    }

    pub fn returns(&self) -> Vec<ReturnRequest> {
        self.state().returns.clone()
    }

    pub fn equipment_returns(&self) -> Vec<EquipmentReturnRequest> {
        self.state().equipment.clone()
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call, wait out the latency, then pop a scripted failure.
    async fn begin(&self, endpoint: Endpoint) -> ClientResult<()> {
        *self.state().calls.entry(endpoint).or_default() += 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let failure = self
            .state()
            .failures
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        match failure {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DockBackend for InMemoryBackend {
    async fn fetch_manifest(&self, wave_number: &str) -> ClientResult<Vec<ManifestItem>> {
        self.begin(Endpoint::Manifest).await?;
        Ok(self
            .state()
            .manifests
            .get(wave_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit_dispatch(&self, request: &DispatchRequest) -> ClientResult<()> {
        self.begin(Endpoint::Submit).await?;
        self.state().dispatches.push(request.clone());
        Ok(())
    }

    async fn submit_return(&self, request: &ReturnRequest) -> ClientResult<ReturnResponse> {
        self.begin(Endpoint::Return).await?;
        let mut state = self.state();
        if !state.returned.insert(request.barcode.clone()) {
            return Err(ClientError::server(
                409,
                format!("Barcode {} was already returned", request.barcode),
            ));
        }
        state.returns.push(request.clone());
        let (driver, city) = state
            .origins
            .get(&request.barcode)
            .cloned()
            .map_or((None, None), |(driver, city)| (Some(driver), city));
        Ok(ReturnResponse {
            barcode: request.barcode.clone(),
            returned_from_driver: driver,
            city,
            is_damaged: request.is_damaged,
        })
    }

    async fn return_equipment(&self, request: &EquipmentReturnRequest) -> ClientResult<()> {
        self.begin(Endpoint::ReturnEquipment).await?;
        self.state().equipment.push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn return_request(barcode: &str) -> ReturnRequest {
        ReturnRequest {
            barcode: barcode.into(),
            username: "clerk".into(),
            is_damaged: false,
        }
    }

    #[tokio::test]
    async fn unknown_wave_is_empty() {
        let backend = InMemoryBackend::new();
        assert!(backend.fetch_manifest("404").await.unwrap().is_empty());
        assert_eq!(backend.calls(Endpoint::Manifest), 1);
    }

    #[tokio::test]
    async fn seeded_manifest_is_returned() {
        let backend = InMemoryBackend::new()
            .with_manifest("7", vec![ManifestItem::new("A1", "O1", Some("12"))]);
        let items = backend.fetch_manifest("7").await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_return_is_rejected_by_server() {
        let backend = InMemoryBackend::new().with_origin("998877", "Avi", Some("Eilat"));

        let resp = backend.submit_return(&return_request("998877")).await.unwrap();
        assert_eq!(resp.returned_from_driver.as_deref(), Some("Avi"));
        assert_eq!(resp.city.as_deref(), Some("Eilat"));

        let err = backend.submit_return(&return_request("998877")).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(backend.returns().len(), 1);
        assert_eq!(backend.calls(Endpoint::Return), 2);
    }

    #[tokio::test]
    async fn scripted_failures_fire_once_in_order() {
        let backend = InMemoryBackend::new();
        backend.fail_next(Endpoint::Return, Failure::Network("reset".into()));
        backend.fail_next(
            Endpoint::Return,
            Failure::Status(503, Some("maintenance".into())),
        );

        let first = backend.submit_return(&return_request("1")).await.unwrap_err();
        assert_eq!(first, ClientError::Network("reset".into()));
        let second = backend.submit_return(&return_request("1")).await.unwrap_err();
        assert_eq!(second.user_message(), "maintenance");
        backend.submit_return(&return_request("1")).await.unwrap();
        assert_eq!(backend.calls(Endpoint::Return), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_response() {
        let backend = InMemoryBackend::new().with_latency(Duration::from_millis(250));
        let start = tokio::time::Instant::now();
        backend.fetch_manifest("7").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
