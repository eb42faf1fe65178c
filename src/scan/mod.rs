//! Scan Controller
//!
//! Owns the repeating capture -> normalize -> recognize -> extract cycle.
//! Every failure inside a cycle is transient: it lands in `last_error` and
//! the next tick retries, with no backoff and no retry cap. The controller
//! stops exactly once, when a single cycle's text carries all three label
//! fields.

use std::time::Duration;

use crossbeam_channel::Sender;
use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::analysis::{extract_fields, ExtractionResult};
use crate::capture::{CaptureDevice, CaptureError, PermissionState};
use crate::vision::{to_image_ref, RecognitionError, TextRecognizer};

/// Default cycle period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1200);

/// Controller state snapshot, published to the host at cycle boundaries.
#[derive(Debug, Clone)]
pub struct ScanState {
    /// A cycle's capture+recognize work is currently in flight.
    pub is_capturing: bool,
    /// Failure message from the most recent failed cycle.
    pub last_error: Option<String>,
    /// False once a complete result has been produced. Terminal.
    pub is_active: bool,
}

impl ScanState {
    fn new() -> Self {
        Self {
            is_capturing: false,
            last_error: None,
            is_active: true,
        }
    }

    /// Set an error message.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Clear any error state.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

/// Why a tick declined to start a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No capture source is present.
    DeviceUnavailable,
    /// Capture permission has not been granted (yet).
    PermissionNotGranted,
    /// The controller has already produced a complete result.
    Finished,
}

/// Outcome of a single tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// The tick was a no-op; the timer keeps running.
    Skipped(SkipReason),
    /// The cycle produced all three fields; scanning is over.
    Completed(ExtractionResult),
    /// The cycle came up short (missing fields or a collaborator failure);
    /// the next tick retries.
    Retry,
}

/// Failure inside one cycle. Never fatal; converted to `last_error` at the
/// cycle boundary.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("capture returned no photo path")]
    MissingPhotoPath,
    #[error("captured frame is not readable: {0}")]
    ImageRef(#[from] std::io::Error),
    #[error("recognition failed: {0}")]
    Recognition(#[from] RecognitionError),
}

/// Drives cycles against a capture device and a text recognizer.
///
/// The controller owns its device for its whole lifetime; nothing else may
/// request frames from it concurrently.
pub struct ScanController<D, R> {
    device: D,
    recognizer: R,
    interval: Duration,
    state: ScanState,
    status_tx: Option<Sender<ScanState>>,
}

impl<D: CaptureDevice, R: TextRecognizer> ScanController<D, R> {
    pub fn new(device: D, recognizer: R) -> Self {
        Self {
            device,
            recognizer,
            interval: DEFAULT_INTERVAL,
            state: ScanState::new(),
            status_tx: None,
        }
    }

    /// Override the cycle period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Publish a state snapshot at every cycle boundary.
    pub fn with_status_channel(mut self, tx: Sender<ScanState>) -> Self {
        self.status_tx = Some(tx);
        self
    }

    /// Current controller state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    fn publish_status(&self) {
        if let Some(tx) = &self.status_tx {
            // A host that stopped listening is not an error.
            let _ = tx.send(self.state.clone());
        }
    }

    /// Run ticks at the configured interval until a cycle produces all three
    /// fields, then resolve with that result.
    ///
    /// Dropping the returned future tears the scan down: the timer is
    /// cancelled, an in-flight cycle never resumes, and neither status nor
    /// completion is delivered afterwards.
    pub async fn run(mut self) -> ExtractionResult {
        if self.device.permission() == PermissionState::Undetermined {
            let answer = self.device.request_permission().await;
            debug!("capture permission request answered: {:?}", answer);
        }

        let mut timer = time::interval(self.interval);
        // A fire that lands while a cycle is still in flight is dropped,
        // never queued; cycles stay strictly sequential.
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;
            match self.tick().await {
                TickOutcome::Completed(result) => return result,
                TickOutcome::Skipped(reason) => debug!("tick skipped: {:?}", reason),
                TickOutcome::Retry => {}
            }
        }
    }

    /// Attempt one cycle. Exposed separately from [`run`] so the polling
    /// contract can be driven without a timer.
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.state.is_active {
            return TickOutcome::Skipped(SkipReason::Finished);
        }
        if !self.device.is_available() {
            return TickOutcome::Skipped(SkipReason::DeviceUnavailable);
        }
        if !self.device.permission().is_granted() {
            return TickOutcome::Skipped(SkipReason::PermissionNotGranted);
        }

        self.state.is_capturing = true;
        self.state.clear_error();
        self.publish_status();

        let outcome = match self.cycle().await {
            Ok(result) if result.is_complete() => {
                info!("all fields recognized; scan complete");
                self.state.is_active = false;
                TickOutcome::Completed(result)
            }
            Ok(result) => {
                debug!(
                    "incomplete read (serial: {}, pin: {}, password: {})",
                    result.serial_number.is_some(),
                    result.pin.is_some(),
                    result.password.is_some()
                );
                TickOutcome::Retry
            }
            Err(err) => {
                warn!("scan cycle failed: {err}");
                self.state.set_error(err.to_string());
                TickOutcome::Retry
            }
        };

        self.state.is_capturing = false;
        self.publish_status();
        outcome
    }

    /// One full capture -> normalize -> recognize -> extract pass.
    async fn cycle(&mut self) -> Result<ExtractionResult, CycleError> {
        let photo = self.device.capture_photo().await?;
        let path = photo.path.ok_or(CycleError::MissingPhotoPath)?;
        let image_ref = to_image_ref(&path)?;
        let lines = self.recognizer.recognize(&image_ref).await?;
        Ok(extract_fields(lines.iter().map(|l| l.text.as_str())))
    }
}
