//! labelscan - read serial, PIN and password fields off a device label
//!
//! Captures frames on a fixed interval, runs OCR over each one and scans the
//! recognized text for `SN:` / `PIN:` / `PW:` markers until a single frame
//! yields all three.

mod analysis;
mod capture;
mod config;
mod scan;
mod vision;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::analysis::ExtractionResult;
use crate::capture::screen::{list_monitors, ScreenCaptureDevice};
use crate::config::AppConfig;
use crate::scan::{ScanController, ScanState};
use crate::vision::{PaddleRecognizer, TextRecognizer};

/// labelscan - capture + OCR label field scanner
#[derive(Parser, Debug)]
#[command(name = "labelscan")]
#[command(about = "Scans captured frames for SN:/PIN:/PW: label fields")]
struct Args {
    /// Path to a TOML config file (defaults to the per-user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Monitor index to capture from (0 = primary)
    #[arg(short, long)]
    monitor: Option<usize>,

    /// Override the scan interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Recognize a single image file and exit (no capture loop)
    #[arg(long)]
    image: Option<PathBuf>,

    /// List available monitors and exit
    #[arg(long)]
    list_monitors: bool,

    /// Write the current configuration to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    // List monitors mode
    if args.list_monitors {
        println!("Available monitors:");
        let monitors = list_monitors();
        if monitors.is_empty() {
            println!("  No monitors detected");
        } else {
            for monitor in &monitors {
                println!(
                    "  [{}] {} - {}x{}{}",
                    monitor.index,
                    monitor.name.as_deref().unwrap_or("Unknown"),
                    monitor.width,
                    monitor.height,
                    if monitor.is_primary { " (primary)" } else { "" }
                );
            }
        }
        return Ok(());
    }

    // Load or create configuration, then apply CLI overrides
    let mut config = load_or_create_config(args.config.as_deref());
    if let Some(interval_ms) = args.interval_ms {
        config.scan.interval_ms = interval_ms;
    }
    if let Some(monitor) = args.monitor {
        config.capture.monitor_index = monitor;
    }

    if args.write_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => config::get_config_dir()?.join("config.toml"),
        };
        config::save_config(&config, &path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to build async runtime")?;

    let result = if let Some(image) = &args.image {
        runtime.block_on(recognize_once(&config, image))?
    } else {
        runtime.block_on(run_scan(&config))?
    };

    print_result(&result, args.json)
}

/// Load configuration from file or create default
fn load_or_create_config(path: Option<&Path>) -> AppConfig {
    if let Some(path) = path {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => warn!("Could not load {:?} ({e}); using defaults", path),
        }
    } else if let Ok(config_dir) = config::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}

fn build_recognizer(config: &AppConfig) -> Result<PaddleRecognizer> {
    PaddleRecognizer::new(
        &config.ocr.detection_model,
        &config.ocr.recognition_model,
        &config.ocr.charset,
        config.ocr.min_confidence,
    )
    .context("failed to initialize the OCR engine")
}

/// Poll the capture device until a frame yields all three fields.
async fn run_scan(config: &AppConfig) -> Result<ExtractionResult> {
    let device = ScreenCaptureDevice::new(
        config.capture.monitor_index,
        config.capture.save_dir.clone(),
    )
    .context("failed to set up the capture device")?;
    let recognizer = build_recognizer(config)?;

    let (status_tx, status_rx) = crossbeam_channel::unbounded();
    let reporter = std::thread::spawn(move || report_status(status_rx));

    info!(
        "scanning every {} ms; hold the label steady in view",
        config.scan.interval_ms
    );

    let controller = ScanController::new(device, recognizer)
        .with_interval(config.scan.interval())
        .with_status_channel(status_tx);

    let result = controller.run().await;

    // run() consumed the sender, so the reporter drains out and exits.
    let _ = reporter.join();

    Ok(result)
}

/// One-shot mode: recognize a single image file and extract fields from it.
async fn recognize_once(config: &AppConfig, image: &Path) -> Result<ExtractionResult> {
    let mut recognizer = build_recognizer(config)?;

    let image_ref = vision::to_image_ref(image)
        .with_context(|| format!("cannot read image {:?}", image))?;
    let lines = recognizer.recognize(&image_ref).await?;

    Ok(analysis::extract_fields(
        lines.iter().map(|l| l.text.as_str()),
    ))
}

/// Log scan state transitions as they stream in from the controller.
fn report_status(status_rx: crossbeam_channel::Receiver<ScanState>) {
    let mut last_error: Option<String> = None;
    for state in status_rx {
        if state.last_error != last_error {
            if let Some(err) = &state.last_error {
                warn!("scan error: {err} (will retry)");
            }
            last_error = state.last_error.clone();
        }
        if !state.is_active {
            info!("scan finished");
        }
    }
}

fn print_result(result: &ExtractionResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!(
        "Serial number: {}",
        result.serial_number.as_deref().unwrap_or("(not found)")
    );
    println!(
        "PIN:           {}",
        result.pin.as_deref().unwrap_or("(not found)")
    );
    println!(
        "Password:      {}",
        result.password.as_deref().unwrap_or("(not found)")
    );

    Ok(())
}
