//! Application entry point for the tractor–trailer parking viewer.
//!
//! This binary sets up logging and configuration, then hands all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use rig_core::RigConfig;
use tracing::{info, warn};
use viewer::Viewer;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` picks the filter (default `info`); `LOG_FORMAT=json`
/// switches to JSON lines. Panics are routed through tracing as well.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Reads the rig tuning named by `RIG_CONFIG`, falling back to defaults.
fn load_config() -> RigConfig {
    let Ok(path) = std::env::var("RIG_CONFIG") else {
        return RigConfig::default();
    };

    match RigConfig::load(&path) {
        Ok(cfg) => {
            info!(%path, "loaded rig config");
            cfg
        }
        Err(error) => {
            warn!(%path, %error, "using default rig config");
            RigConfig::default()
        }
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = load_config();
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Tractor Trailer Parking",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg)))),
    )
}
