use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use dock_client::{ClientError, ClientResult, DockBackend};
use dock_scan::{ScanConfig, ScanDecision};
use dock_types::{Lane, ReturnRecord, ReturnRequest, ReturnResponse, ScanEvent};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cooldown::{CooldownState, ProcessedBarcodeRegistry};
use crate::error::{IntakeError, IntakeResult};
use crate::event::{IntakeEvent, SkipReason, SubmitOutcome};
use crate::lane::Lanes;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Idempotent submission engine shared by the return and damage lanes.
///
/// Cheap to clone; clones share the same session state. All mutable state
/// sits behind one mutex that is never held across the remote call, so the
/// critical section of a submission is: admit, release the lock, call the
/// backend, re-lock, commit or roll back.
#[derive(Clone)]
pub struct IntakeCoordinator {
    shared: Arc<Shared>,
}

struct Shared {
    backend: Arc<dyn DockBackend>,
    username: String,
    config: ScanConfig,
    state: Mutex<IntakeState>,
    events: broadcast::Sender<IntakeEvent>,
}

struct IntakeState {
    history: Vec<ReturnRecord>,
    registry: ProcessedBarcodeRegistry,
    cooldown: CooldownState,
    lanes: Lanes,
}

impl IntakeState {
    fn release_expired(&mut self, now: Instant) {
        if let Some(barcode) = self.cooldown.release_if_expired(now) {
            self.registry.release(&barcode);
            debug!(%barcode, "cooldown released");
        }
    }

    /// Gate checks and the optimistic marks, in one step under the lock.
    fn admit(&mut self, barcode: &str, lane: Lane, now: Instant) -> IntakeResult<Option<SkipReason>> {
        if self.history.iter().any(|r| r.barcode == barcode) {
            return Err(IntakeError::AlreadyScanned {
                barcode: barcode.to_string(),
            });
        }

        self.release_expired(now);
        if self.cooldown.is_active() || self.cooldown.last_barcode() == barcode {
            return Ok(Some(SkipReason::CoolingDown));
        }
        if self.registry.contains(barcode) {
            return Ok(Some(SkipReason::InFlight));
        }

        self.cooldown.engage(barcode);
        self.registry.mark(barcode);
        self.lanes.get_mut(lane).last_processed = Some(barcode.to_string());
        Ok(None)
    }
}

impl IntakeCoordinator {
    pub fn new(
        backend: Arc<dyn DockBackend>,
        username: impl Into<String>,
        config: ScanConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let state = IntakeState {
            history: Vec::new(),
            registry: ProcessedBarcodeRegistry::default(),
            cooldown: CooldownState::default(),
            lanes: Lanes::new(&config),
        };
        Self {
            shared: Arc::new(Shared {
                backend,
                username: username.into(),
                config,
                state: Mutex::new(state),
                events,
            }),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.shared.config
    }

    pub fn username(&self) -> &str {
        &self.shared.username
    }

    /// Receive an event for every submission attempt from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<IntakeEvent> {
        self.shared.events.subscribe()
    }

    /// Accepted returns of this session, oldest first.
    pub fn history(&self) -> Vec<ReturnRecord> {
        self.lock().history.clone()
    }

    pub fn is_cooling_down(&self) -> bool {
        let mut state = self.lock();
        state.release_expired(Instant::now());
        state.cooldown.is_active()
    }

    pub fn lane_buffer(&self, lane: Lane) -> String {
        self.lock().lanes.get(lane).buffer.clone()
    }

    /// Record a new snapshot of the lane's input buffer.
    ///
    /// Every update invalidates the lane's pending auto-commit. If the
    /// buffer looks like a scanner burst, a new auto-commit is scheduled on
    /// the tokio runtime; it submits the buffer once the debounce delay
    /// passes without another update. Must be called within a runtime.
    pub fn input(&self, lane: Lane, value: &str) -> ScanDecision {
        let now = Instant::now();
        let (decision, generation) = {
            let mut state = self.lock();
            let lane_state = state.lanes.get_mut(lane);
            lane_state.buffer.clear();
            lane_state.buffer.push_str(value);
            let event = ScanEvent::new(lane, value, now.into_std());
            let decision = lane_state.classifier.observe_event(&event);
            (decision, lane_state.bump())
        };

        if let ScanDecision::ScheduleAutoCommit(delay) = decision {
            let this = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                this.auto_commit(lane, generation).await;
            });
        }
        decision
    }

    /// Explicit Enter: cancel the pending auto-commit and submit the
    /// buffer now, whatever the classifier thought of it.
    pub async fn enter(&self, lane: Lane) -> IntakeResult<SubmitOutcome> {
        let barcode = {
            let mut state = self.lock();
            let lane_state = state.lanes.get_mut(lane);
            lane_state.bump();
            lane_state.buffer.clone()
        };
        self.submit_scan(&barcode, lane, lane.is_damaged()).await
    }

    async fn auto_commit(&self, lane: Lane, generation: u64) {
        let barcode = {
            let state = self.lock();
            let lane_state = state.lanes.get(lane);
            if lane_state.generation != generation {
                return;
            }
            if lane_state.last_processed.as_deref() == Some(lane_state.buffer.trim()) {
                return;
            }
            lane_state.buffer.clone()
        };
        debug!(%lane, %barcode, "debounce elapsed, auto-committing");
        // The outcome reaches the operator through the event stream.
        let _ = self.submit_scan(&barcode, lane, lane.is_damaged()).await;
    }

    /// Submit one scanned barcode to `POST /return`.
    ///
    /// At most one network call is made per accepted barcode, and only one
    /// submission may be in flight across both lanes; anything arriving
    /// meanwhile is dropped, not queued. On failure the optimistic marks are
    /// rolled back so the same barcode can be retried once the cooldown
    /// passes. Dropping the returned future does not cancel an admitted
    /// request; it still resolves and releases the cooldown.
    pub async fn submit_scan(
        &self,
        barcode: &str,
        lane: Lane,
        is_damaged: bool,
    ) -> IntakeResult<SubmitOutcome> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Ok(SubmitOutcome::Skipped(SkipReason::Empty));
        }

        let admitted = self.lock().admit(barcode, lane, Instant::now());
        match admitted {
            Ok(None) => {}
            Ok(Some(reason)) => {
                debug!(%lane, %barcode, %reason, "scan dropped");
                return self.publish(lane, barcode, Ok(SubmitOutcome::Skipped(reason)));
            }
            Err(err) => {
                info!(%lane, %barcode, "scan rejected: already in history");
                return self.publish(lane, barcode, Err(err));
            }
        }

        // The remote call and its resolution run as one detached task, so a
        // caller that stops waiting cannot leave the cooldown armed.
        let this = self.clone();
        let owned = barcode.to_string();
        let resolution = tokio::spawn(async move {
            let request = ReturnRequest {
                barcode: owned,
                username: this.shared.username.clone(),
                is_damaged,
            };
            debug!(%lane, barcode = %request.barcode, is_damaged, "submitting return");
            let response = this.shared.backend.submit_return(&request).await;
            this.resolve(lane, &request.barcode, response)
        });

        match resolution.await {
            Ok(result) => result,
            Err(err) => {
                warn!(%lane, %barcode, error = %err, "return task aborted");
                self.resolve(lane, barcode, Err(ClientError::Network(err.to_string())))
            }
        }
    }

    /// Commit or roll back an admitted submission and arm the cooldown
    /// release.
    fn resolve(
        &self,
        lane: Lane,
        barcode: &str,
        response: ClientResult<ReturnResponse>,
    ) -> IntakeResult<SubmitOutcome> {
        let result = {
            let mut state = self.lock();
            state
                .cooldown
                .release_at(Instant::now() + self.shared.config.cooldown());
            match response {
                Ok(response) => {
                    let record = ReturnRecord::from_response(response, Utc::now());
                    state.history.push(record.clone());
                    state.lanes.get_mut(lane).clear_buffer();
                    info!(
                        %lane,
                        barcode = %record.barcode,
                        driver = record.driver_name.as_deref().unwrap_or("-"),
                        "return recorded"
                    );
                    Ok(SubmitOutcome::Recorded(record))
                }
                Err(err) => {
                    state.registry.release(barcode);
                    state.lanes.get_mut(lane).last_processed = None;
                    warn!(%lane, %barcode, error = %err, "return failed, rolled back");
                    Err(IntakeError::from(err))
                }
            }
        };
        self.publish(lane, barcode, result)
    }

    fn publish(
        &self,
        lane: Lane,
        barcode: &str,
        result: IntakeResult<SubmitOutcome>,
    ) -> IntakeResult<SubmitOutcome> {
        // No subscribers is fine.
        let _ = self.shared.events.send(IntakeEvent {
            lane,
            barcode: barcode.to_string(),
            result: result.clone(),
        });
        result
    }

    fn lock(&self) -> MutexGuard<'_, IntakeState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
