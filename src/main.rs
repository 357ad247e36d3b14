//! Loadgate demo binary
//!
//! Headless walkthrough of the loading gate: loads a scenario manifest,
//! streams every listed asset through the file source, reports aggregate
//! progress, and runs the welcome-screen flow once everything is in.

use std::cell::Cell;
use std::path::Path;
use std::process;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use loadgate::config::AppConfig;
use loadgate::headless::HeadlessPlatform;
use loadgate_core::{
    AssetError, AssetPayload, FileSource, LoadingOrchestrator, ScenarioManifest,
};

/// Demo payload: the raw bytes, kept opaque
struct RawAsset {
    bytes: Vec<u8>,
}

impl AssetPayload for RawAsset {
    fn from_bytes(_path: &Path, bytes: Vec<u8>) -> Result<Self, AssetError> {
        Ok(RawAsset { bytes })
    }
}

fn main() {
    // Load configuration before logging so the default filter can come
    // from it; report any load failure right after init
    let (config, config_err) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.debug.log_level),
    )
    .init();

    log::info!("Starting loadgate");
    if let Some(e) = config_err {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    // Load the scenario manifest
    let manifest = match ScenarioManifest::load(&config.loading.manifest) {
        Ok(manifest) => manifest,
        Err(e) => {
            log::error!(
                "Failed to load manifest '{}': {}",
                config.loading.manifest,
                e
            );
            process::exit(1);
        }
    };
    log::info!(
        "Loaded scenario '{}' with {} assets",
        manifest.name,
        manifest.assets.len()
    );

    // Wire the gate: file source + headless collaborators
    let source: FileSource<RawAsset> = FileSource::with_chunk_size(config.loading.chunk_size);
    let platform = HeadlessPlatform::new(config.platform.mobile);
    let mut gate = LoadingOrchestrator::new(source, platform);

    // The first session gets the scenario's welcome screen
    if gate.first_load {
        if let Some(intro) = manifest.intro() {
            gate.register_welcome_screen(intro);
        }
    }

    // Register every manifest asset
    let total_bytes = Rc::new(Cell::new(0u64));
    for asset in &manifest.assets {
        let counter = Rc::clone(&total_bytes);
        let label = asset.label.clone().unwrap_or_else(|| asset.path.clone());
        gate.begin_load(&asset.path, move |raw: RawAsset| {
            log::debug!("decoded '{}' ({} bytes)", label, raw.bytes.len());
            counter.set(counter.get() + raw.bytes.len() as u64);
        });
    }

    // Pump loop: report percentage, handle the welcome modal, stop on
    // completion or failure
    let poll = Duration::from_millis(config.loading.poll_interval_ms);
    let mut last_reported = -1.0f32;
    loop {
        gate.pump();

        let pct = gate.loading_percentage();
        if (pct - last_reported).abs() >= 1.0 {
            log::info!("loading {:.0}%", pct);
            last_reported = pct;
        }

        if let Some(dialog) = gate.platform_mut().take_open_dialog() {
            log::info!(
                "[{}] {} ({})",
                dialog.title,
                dialog.content,
                dialog.confirm_label
            );
            gate.dialog_dismissed();
        }

        if gate.has_failures() {
            for path in gate.failed_paths() {
                log::error!("giving up on '{}'", path);
            }
            process::exit(1);
        }
        if gate.is_loading_done() {
            break;
        }

        thread::sleep(poll);
    }

    gate.first_load = false;
    log::info!(
        "Scenario '{}' ready: {} assets, {} bytes",
        manifest.name,
        gate.entries().len(),
        total_bytes.get()
    );
}
