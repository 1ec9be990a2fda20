//! TouchTray entry point.
//!
//! Startup order matters: the single-instance mutex comes first, so a
//! duplicate launch terminates before any other component is constructed
//! and before anything is written to disk.  Only the winning instance goes
//! on to load configuration, initialise logging, and run the event loop
//! that resolves the device and shows the icon.  Any failure before the
//! loop starts is reported through a modal dialog, because a tray app has
//! no console the user would see.

#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]

use std::process::ExitCode;

fn main() -> ExitCode {
    #[cfg(target_os = "windows")]
    {
        windows_main()
    }

    #[cfg(not(target_os = "windows"))]
    {
        eprintln!("touchtray controls devices through the Windows SetupAPI and only runs on Windows");
        ExitCode::FAILURE
    }
}

#[cfg(target_os = "windows")]
fn windows_main() -> ExitCode {
    use anyhow::Context;
    use tracing::info;
    use tracing_subscriber::EnvFilter;

    use touchtray_app::infrastructure::dialogs::{
        self, ALREADY_RUNNING_TEXT, CRASH_CAPTION, LAUNCH_FAILURE_CAPTION,
    };
    use touchtray_app::infrastructure::event_loop;
    use touchtray_app::infrastructure::instance::{InstanceLock, LOCK_NAME};
    use touchtray_app::infrastructure::storage::config;

    // The mutex is taken before anything else exists; a losing instance
    // must exit without constructing a single other component or touching
    // the config file.
    let _lock = match InstanceLock::acquire(LOCK_NAME) {
        Ok(Some(lock)) => lock,
        Ok(None) => {
            dialogs::fatal(LAUNCH_FAILURE_CAPTION, ALREADY_RUNNING_TEXT);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            dialogs::fatal(LAUNCH_FAILURE_CAPTION, &e.to_string());
            return ExitCode::FAILURE;
        }
    };

    // An unhandled panic in a windowless process would vanish silently.
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!("panic: {panic_info}");
        dialogs::fatal(CRASH_CAPTION, &panic_info.to_string());
    }));

    let loaded = config::config_file_path()
        .context("locating the configuration file")
        .and_then(|path| {
            let cfg = config::load_config().context("loading the configuration")?;
            Ok((cfg, path))
        });
    let (cfg, config_path) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            dialogs::fatal(LAUNCH_FAILURE_CAPTION, &format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    };

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.app.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("TouchTray starting, config at {}", config_path.display());

    // Materialise the defaults on first run so the user has a file to edit.
    // Only the lock-holding instance ever gets here.
    match config::ensure_config_file(&cfg) {
        Ok(true) => info!("wrote default configuration to {}", config_path.display()),
        Ok(false) => {}
        Err(e) => tracing::warn!("could not write default config: {e}"),
    }

    // The guard stays alive for the whole loop and drops on return, which
    // is why the loop must hand back control instead of exiting the
    // process itself.
    let code = event_loop::run(&cfg);
    info!("TouchTray stopped");
    ExitCode::from(code.clamp(0, u8::MAX as i32) as u8)
}
