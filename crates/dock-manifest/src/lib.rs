//! Wave manifest reconciliation for Dock.
//!
//! A [`ManifestReconciler`] loads the expected lines of a wave, accepts
//! removal scans for items pulled off the truck, and submits whatever is
//! left as a dispatch. Lines canceled upstream (gate `"OUT"`) never ship
//! and cannot be removed.
//!
//! ```no_run
//! # async fn run(backend: std::sync::Arc<dyn dock_client::DockBackend>) -> Result<(), dock_manifest::ReconcileError> {
//! use dock_manifest::{ManifestReconciler, Preconfirmed};
//!
//! let mut reconciler = ManifestReconciler::new(backend, "clerk");
//! reconciler.load_manifest("7").await?;
//! reconciler.scan_removal("A1")?;
//! let request = reconciler
//!     .submit_dispatch("TRK-1", "Dana", 3, &Preconfirmed)
//!     .await?;
//! assert_eq!(request.logistics.ice(), 12);
//! # Ok(())
//! # }
//! ```

pub mod confirm;
pub mod error;
pub mod group;
pub mod reconciler;

pub use confirm::{DispatchConfirmation, Preconfirmed};
pub use error::{ReconcileError, ReconcileResult};
pub use group::{ManifestSummary, OrderGroup};
pub use reconciler::ManifestReconciler;
