//! Screen capture backend
//!
//! Grabs frames from a monitor via `xcap` and stores them as PNG files for
//! the recognizer to pick up. Capturing the screen is a read-only operation
//! and needs no runtime permission prompt on the supported platforms.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;
use xcap::image::EncodableLayout;

use super::{CaptureDevice, CaptureError, CapturedPhoto, PermissionState};

/// A monitor the capture backend can see.
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub index: usize,
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

/// Enumerate available monitors.
pub fn list_monitors() -> Vec<MonitorInfo> {
    let Ok(monitors) = xcap::Monitor::all() else {
        return Vec::new();
    };

    monitors
        .iter()
        .enumerate()
        .map(|(index, monitor)| MonitorInfo {
            index,
            name: monitor.name().ok(),
            width: monitor.width().unwrap_or(0),
            height: monitor.height().unwrap_or(0),
            is_primary: monitor.is_primary().unwrap_or(false),
        })
        .collect()
}

/// Capture device backed by a monitor grab.
pub struct ScreenCaptureDevice {
    monitor_index: usize,
    save_dir: PathBuf,
    frame_seq: u64,
}

impl ScreenCaptureDevice {
    /// Set up capture for the given monitor. Frames land in `save_dir`, or
    /// in a per-application temp directory when none is given.
    pub fn new(monitor_index: usize, save_dir: Option<PathBuf>) -> Result<Self, CaptureError> {
        let save_dir = save_dir.unwrap_or_else(|| std::env::temp_dir().join("labelscan"));
        std::fs::create_dir_all(&save_dir)?;

        Ok(Self {
            monitor_index,
            save_dir,
            frame_seq: 0,
        })
    }

    fn monitor(&self) -> Result<xcap::Monitor, CaptureError> {
        let monitors = xcap::Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;
        monitors
            .into_iter()
            .nth(self.monitor_index)
            .ok_or_else(|| CaptureError::Backend(format!("monitor {} not found", self.monitor_index)))
    }
}

#[async_trait]
impl CaptureDevice for ScreenCaptureDevice {
    fn is_available(&self) -> bool {
        xcap::Monitor::all()
            .map(|monitors| monitors.len() > self.monitor_index)
            .unwrap_or(false)
    }

    fn permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    async fn request_permission(&mut self) -> PermissionState {
        PermissionState::Granted
    }

    async fn capture_photo(&mut self) -> Result<CapturedPhoto, CaptureError> {
        let monitor = self.monitor()?;
        let frame = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        let (width, height) = (frame.width(), frame.height());
        let buffer = image::RgbaImage::from_raw(width, height, frame.as_bytes().to_vec())
            .ok_or_else(|| CaptureError::Backend("capture returned a truncated frame".into()))?;

        self.frame_seq += 1;
        let path = self.save_dir.join(format!("frame-{:06}.png", self.frame_seq));
        buffer.save(&path)?;

        debug!("captured {}x{} frame to {:?}", width, height, path);

        Ok(CapturedPhoto { path: Some(path) })
    }
}
