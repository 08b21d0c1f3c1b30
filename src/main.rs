//! Application entry point — grammar-hotkey.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (writing the defaults out on first run)
//!    and apply `CHECKER_*` environment overrides.
//! 3. Verify the correction service is reachable and the model exists —
//!    unreachable exits with status 1, missing model with status 2.
//! 4. Parse the hotkey chord and spawn the rdev listener thread.
//! 5. Run the pipeline orchestrator until the hotkey channel closes.

use std::sync::Arc;

use tokio::sync::mpsc;

use grammar_hotkey::{
    clipboard::SystemClipboard,
    config::{AppConfig, AppPaths, HotkeyConfig},
    hotkey::{Chord, HotkeyListener},
    pipeline::PipelineRunner,
    report::Reporter,
    service::{CorrectionService, OllamaClient, ServiceError},
};

/// Exit status for an unreachable correction service.
const EXIT_UNREACHABLE: i32 = 1;
/// Exit status for a missing model.
const EXIT_MODEL_MISSING: i32 = 2;

#[tokio::main(worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("grammar-hotkey starting up");

    // 2. Configuration: file layer, then env overrides
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // First run: write the defaults out so users have a file to edit. Done
    // before the env layer so CHECKER_* values never end up baked into it.
    let settings_file = AppPaths::new().settings_file;
    if !settings_file.exists() {
        if let Err(e) = config.save() {
            log::warn!("Could not write {}: {e}", settings_file.display());
        }
    }

    config.apply_env_overrides();

    let reporter = Reporter::new();

    // 3. Startup check — fail fast with distinct statuses before accepting
    //    any activation.
    let service = Arc::new(OllamaClient::from_config(&config.service));
    match service.check_ready().await {
        Ok(()) => {}
        Err(e @ ServiceError::ModelMissing(_)) => {
            reporter.failure(&e.to_string());
            std::process::exit(EXIT_MODEL_MISSING);
        }
        Err(e) => {
            reporter.failure(&format!("Failed to connect to the correction service: {e}"));
            std::process::exit(EXIT_UNREACHABLE);
        }
    }

    reporter.progress("Startup tasks passed.");
    reporter.progress(&format!("Using model: {}", config.service.model));
    reporter.progress(&format!("Using prompt: {}\n", config.service.prompt));

    // 4. Hotkey listener thread
    let chord = Chord::parse(&config.hotkey.chord).unwrap_or_else(|| {
        log::warn!(
            "Unrecognised hotkey chord {:?}; falling back to the platform default",
            config.hotkey.chord
        );
        Chord::parse(&HotkeyConfig::default_chord()).expect("default chord must parse")
    });
    reporter.progress(&format!("Listening for hotkey: {}", config.hotkey.chord));

    let (hotkey_tx, hotkey_rx) = mpsc::channel(16);
    let _listener = HotkeyListener::start(chord, hotkey_tx);

    // 5. Pipeline orchestrator — runs until the listener channel closes,
    //    which in practice means process exit.
    let gateway = Arc::new(SystemClipboard::from_config(&config.runner));
    let runner = PipelineRunner::new(gateway, service, reporter, &config.runner);
    runner.run(hotkey_rx).await;

    Ok(())
}
