use std::sync::Arc;

use chrono::{DateTime, Utc};
use dock_client::DockBackend;
use dock_types::EquipmentReturnRequest;
use tracing::{info, warn};

use crate::error::{EquipmentError, EquipmentResult};

/// A standalone equipment return accepted by the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EquipmentReturn {
    pub driver_name: String,
    pub coolers: u32,
    pub ice: u64,
    pub timestamp: DateTime<Utc>,
}

/// Records coolers and ice handed back by drivers.
///
/// Holds no manifest or scan state; the only thing it remembers is the
/// list of returns accepted during this session.
pub struct EquipmentLedger {
    backend: Arc<dyn DockBackend>,
    username: String,
    returns: Vec<EquipmentReturn>,
}

impl EquipmentLedger {
    pub fn new(backend: Arc<dyn DockBackend>, username: impl Into<String>) -> Self {
        Self {
            backend,
            username: username.into(),
            returns: Vec::new(),
        }
    }

    /// Returns accepted this session, oldest first.
    pub fn returns(&self) -> &[EquipmentReturn] {
        &self.returns
    }

    /// Send a standalone equipment return for `driver`.
    ///
    /// Requires a driver and at least one cooler or bag of ice; otherwise
    /// nothing is sent.
    pub async fn return_equipment(
        &mut self,
        driver: Option<&str>,
        coolers: u32,
        ice: u64,
    ) -> EquipmentResult<&EquipmentReturn> {
        let driver = driver
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(EquipmentError::MissingDriver)?;
        if coolers == 0 && ice == 0 {
            return Err(EquipmentError::NothingToReturn);
        }

        let request = EquipmentReturnRequest {
            driver_name: driver.to_string(),
            coolers,
            ice,
            username: self.username.clone(),
        };
        if let Err(err) = self.backend.return_equipment(&request).await {
            warn!(driver, error = %err, "equipment return failed");
            return Err(err.into());
        }

        info!(driver, coolers, ice, "equipment returned");
        self.returns.push(EquipmentReturn {
            driver_name: request.driver_name,
            coolers,
            ice,
            timestamp: Utc::now(),
        });
        Ok(&self.returns[self.returns.len() - 1])
    }
}
