use std::sync::Arc;

use dock_client::{ClientError, DockBackend};
use dock_types::{DispatchRequest, Logistics, Manifest, ManifestItem};
use tracing::{debug, info, warn};

use crate::confirm::DispatchConfirmation;
use crate::error::{ReconcileError, ReconcileResult};
use crate::group::{self, ManifestSummary, OrderGroup};

/// Reconciles a wave manifest against removal scans and submits the
/// resulting dispatch.
///
/// The final shipment, the order grouping and the summary are derived on
/// every read; only the manifest and the removal set are stored. Coolers
/// are not held here: they are an input of each dispatch.
pub struct ManifestReconciler {
    backend: Arc<dyn DockBackend>,
    username: String,
    manifest: Option<Manifest>,
    /// Most recent removal first.
    removals: Vec<String>,
}

impl ManifestReconciler {
    pub fn new(backend: Arc<dyn DockBackend>, username: impl Into<String>) -> Self {
        Self {
            backend,
            username: username.into(),
            manifest: None,
            removals: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn wave_number(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.wave_number.as_str())
    }

    pub fn detected_gate(&self) -> Option<&str> {
        self.manifest.as_ref().map(|m| m.detected_gate.as_str())
    }

    /// Removed barcodes, most recent first.
    pub fn removals(&self) -> &[String] {
        &self.removals
    }

    pub fn is_removed(&self, barcode: &str) -> bool {
        self.removals.iter().any(|b| b == barcode)
    }

    /// Fetch the manifest of `wave_number` and make it the current wave.
    ///
    /// An empty manifest or a non-2xx answer leaves the current state alone
    /// and reports the wave as not found.
    pub async fn load_manifest(&mut self, wave_number: &str) -> ReconcileResult<&Manifest> {
        let wave_number = wave_number.trim();
        if wave_number.is_empty() {
            return Err(ReconcileError::MissingField("wave number"));
        }

        let items = match self.backend.fetch_manifest(wave_number).await {
            Ok(items) => items,
            Err(ClientError::Server { status, .. }) => {
                debug!(wave = wave_number, status, "manifest request rejected");
                return Err(ReconcileError::WaveNotFound {
                    wave: wave_number.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let manifest = Manifest::new(wave_number, items);
        if manifest.is_empty() {
            return Err(ReconcileError::WaveNotFound {
                wave: wave_number.to_string(),
            });
        }
        info!(
            wave = wave_number,
            items = manifest.len(),
            gate = %manifest.detected_gate,
            canceled = manifest.canceled_count(),
            "manifest loaded"
        );
        self.removals.clear();
        Ok(self.manifest.insert(manifest))
    }

    /// Mark `barcode` as physically pulled from the shipment.
    pub fn scan_removal(&mut self, barcode: &str) -> ReconcileResult<&ManifestItem> {
        let barcode = barcode.trim();
        let manifest = self.manifest.as_ref().ok_or(ReconcileError::NoManifest)?;
        let item = manifest
            .get(barcode)
            .ok_or_else(|| ReconcileError::NotInWave {
                barcode: barcode.to_string(),
            })?;
        if item.is_canceled() {
            return Err(ReconcileError::AlreadyCanceled {
                barcode: barcode.to_string(),
            });
        }
        if self.removals.iter().any(|b| b == barcode) {
            return Err(ReconcileError::AlreadyRemoved {
                barcode: barcode.to_string(),
            });
        }

        self.removals.insert(0, barcode.to_string());
        debug!(barcode, removed = self.removals.len(), "item removed");
        Ok(item)
    }

    /// Undo a removal. Returns `false` if the barcode was not removed.
    pub fn restore_item(&mut self, barcode: &str) -> bool {
        let barcode = barcode.trim();
        let before = self.removals.len();
        self.removals.retain(|b| b != barcode);
        let restored = self.removals.len() != before;
        if restored {
            debug!(barcode, "item restored");
        }
        restored
    }

    /// Lines that will actually be shipped: neither removed nor canceled.
    pub fn final_shipment(&self) -> Vec<&ManifestItem> {
        let Some(manifest) = &self.manifest else {
            return Vec::new();
        };
        manifest
            .items
            .iter()
            .filter(|item| !item.is_canceled() && !self.is_removed(&item.barcode))
            .collect()
    }

    pub fn group_by_order(&self) -> Vec<OrderGroup<'_>> {
        match &self.manifest {
            Some(manifest) => group::group_by_order(&manifest.items, |b| self.is_removed(b)),
            None => Vec::new(),
        }
    }

    pub fn summary(&self) -> ManifestSummary {
        let Some(manifest) = &self.manifest else {
            return ManifestSummary::default();
        };
        let removed = manifest
            .items
            .iter()
            .filter(|item| !item.is_canceled() && self.is_removed(&item.barcode))
            .count();
        let canceled = manifest.canceled_count();
        ManifestSummary {
            total: manifest.len(),
            removed,
            canceled,
            shipping: manifest.len() - removed - canceled,
        }
    }

    /// Build the request [`submit_dispatch`](Self::submit_dispatch) would
    /// send, without sending it.
    pub fn prepare_dispatch(
        &self,
        vehicle_number: &str,
        driver_name: &str,
        coolers: u32,
    ) -> ReconcileResult<DispatchRequest> {
        let vehicle_number = vehicle_number.trim();
        let driver_name = driver_name.trim();
        if vehicle_number.is_empty() {
            return Err(ReconcileError::MissingField("vehicle number"));
        }
        if driver_name.is_empty() {
            return Err(ReconcileError::MissingField("driver name"));
        }
        let manifest = self.manifest.as_ref().ok_or(ReconcileError::NoManifest)?;

        let assets: Vec<ManifestItem> = self.final_shipment().into_iter().cloned().collect();
        if assets.is_empty() {
            return Err(ReconcileError::NothingToShip);
        }

        Ok(DispatchRequest {
            wave_number: manifest.wave_number.clone(),
            vehicle_number: vehicle_number.to_string(),
            driver_name: driver_name.to_string(),
            username: self.username.clone(),
            assets,
            logistics: Logistics::for_coolers(coolers),
        })
    }

    /// Validate, confirm and submit the final shipment as a dispatch.
    ///
    /// On success all dispatch state is reset and the submitted request is
    /// returned. On any failure the state is left as it was so the operator
    /// can retry.
    pub async fn submit_dispatch(
        &mut self,
        vehicle_number: &str,
        driver_name: &str,
        coolers: u32,
        confirmation: &impl DispatchConfirmation,
    ) -> ReconcileResult<DispatchRequest> {
        let request = self.prepare_dispatch(vehicle_number, driver_name, coolers)?;

        if !confirmation.confirm(&request) {
            debug!(wave = %request.wave_number, "dispatch declined");
            return Err(ReconcileError::NotConfirmed);
        }

        if let Err(err) = self.backend.submit_dispatch(&request).await {
            warn!(wave = %request.wave_number, error = %err, "dispatch failed");
            return Err(err.into());
        }

        info!(
            wave = %request.wave_number,
            vehicle = %request.vehicle_number,
            driver = %request.driver_name,
            assets = request.assets.len(),
            coolers = request.logistics.coolers(),
            ice = request.logistics.ice(),
            "dispatch submitted"
        );
        self.reset();
        Ok(request)
    }

    /// Drop the current wave and all dispatch state.
    pub fn reset(&mut self) {
        self.manifest = None;
        self.removals.clear();
    }
}
