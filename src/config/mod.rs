//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scan loop settings
    pub scan: ScanSettings,
    /// Capture settings
    pub capture: CaptureSettings,
    /// OCR settings
    pub ocr: OcrSettings,
}

/// Scan loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Milliseconds between capture cycles
    pub interval_ms: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self { interval_ms: 1200 }
    }
}

impl ScanSettings {
    /// The cycle period as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Capture-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Monitor to capture from (0 = primary)
    pub monitor_index: usize,
    /// Where captured frames are written; a temp directory when unset
    pub save_dir: Option<PathBuf>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            monitor_index: 0,
            save_dir: None,
        }
    }
}

/// OCR-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Path to the text detection model
    pub detection_model: PathBuf,
    /// Path to the text recognition model
    pub recognition_model: PathBuf,
    /// Path to the recognition character set
    pub charset: PathBuf,
    /// Minimum confidence for a recognized text block (0.0 - 1.0)
    pub min_confidence: f32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            detection_model: PathBuf::from("models/detection.onnx"),
            recognition_model: PathBuf::from("models/recognition.onnx"),
            charset: PathBuf::from("models/charset.txt"),
            min_confidence: 0.5,
        }
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "labelscan", "labelscan")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
