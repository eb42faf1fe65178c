//! Frame Capture Layer
//!
//! Port over the capture hardware. The scan controller polls availability
//! and permission before every cycle and asks for exactly one photo per
//! cycle; the backend persists the frame and hands back its location.

pub mod screen;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Tri-state capture permission signal.
///
/// Desktop backends grant this implicitly; camera-style backends may have to
/// prompt the user, which is what `Undetermined` is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionState {
    /// Only `Granted` allows a capture cycle to run.
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

/// A single captured frame persisted by the backend.
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    /// Location of the encoded image. A backend that reports success without
    /// producing a path is malformed; the cycle surfaces that as an error.
    pub path: Option<PathBuf>,
}

/// Failure reported by the capture backend.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture backend error: {0}")]
    Backend(String),
    #[error("could not encode frame: {0}")]
    Encode(#[from] image::ImageError),
    #[error("could not store frame: {0}")]
    Store(#[from] std::io::Error),
}

/// Port over a photo-producing capture device.
#[async_trait]
pub trait CaptureDevice {
    /// Whether a capture source is currently present.
    fn is_available(&self) -> bool;

    /// Current permission signal, polled before every cycle.
    fn permission(&self) -> PermissionState;

    /// Ask the platform for capture permission. Invoked once at startup when
    /// the signal is still undetermined.
    async fn request_permission(&mut self) -> PermissionState;

    /// Capture one frame and persist it.
    async fn capture_photo(&mut self) -> Result<CapturedPhoto, CaptureError>;
}
