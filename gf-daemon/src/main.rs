//! gpufan daemon (gpufand)
//!
//! Keeps an AMD GPU's junction temperature within a safe band by driving
//! its hwmon PWM fan output.
//!
//! # Process Model
//! - **Privilege**: must run as root for /sys write access
//! - **Worker**: discovery and the control loop run on a blocking thread
//! - **Signals**: SIGINT/SIGTERM end the process at once, with no cleanup;
//!   the fan keeps its last PWM value
//! - **Failure**: any hardware error after discovery is fatal (exit status 1)

mod fan_control;

use std::process;

use gf_core::{ControlConfig, SysfsStore};
use gf_error::GpufanError;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::{error, info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter
const LOG_ENV: &str = "GPUFAN_LOG";

const JOURNALD_SOCKET: &str = "/run/systemd/journal/socket";

// ============================================================================
// Logging
// ============================================================================

/// Journald when available, stderr otherwise. Returns whether journald is used.
fn init_logging(log_level: &str) -> bool {
    use tracing_subscriber::prelude::*;

    if std::path::Path::new(JOURNALD_SOCKET).exists() {
        match tracing_journald::layer() {
            Ok(journald_layer) => {
                tracing_subscriber::registry()
                    .with(journald_layer)
                    .with(tracing_subscriber::EnvFilter::new(log_level))
                    .init();
                return true;
            }
            Err(e) => {
                eprintln!("Failed to create journald layer: {}, falling back to stderr", e);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_env_filter(log_level)
        .init();
    false
}

// ============================================================================
// Privileges
// ============================================================================

fn check_privileges(euid: libc::uid_t) -> Result<(), GpufanError> {
    if euid != 0 {
        return Err(GpufanError::PermissionDenied(format!(
            "gpufand must run as root for hardware access (euid={})",
            euid
        )));
    }
    Ok(())
}

fn verify_privileges() -> Result<(), GpufanError> {
    // SAFETY: geteuid and getuid only return the process's user IDs.
    let euid = unsafe { libc::geteuid() };
    let uid = unsafe { libc::getuid() };

    check_privileges(euid)?;
    if uid != 0 {
        warn!("Running as setuid root (uid={})", uid);
    }
    Ok(())
}

// ============================================================================
// Signals
// ============================================================================

struct TerminationSignals {
    interrupt: Signal,
    terminate: Signal,
}

impl TerminationSignals {
    fn install() -> std::io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the first termination request and return its name
    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let log_level = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    let use_journald = init_logging(&log_level);

    info!("STARTUP: gpufand {} starting", VERSION);
    info!("STARTUP: Logging to {}", if use_journald { "systemd journal" } else { "stderr" });

    if let Err(e) = verify_privileges() {
        error!("{}", e);
        process::exit(1);
    }

    let config = ControlConfig::default();
    if let Err(e) = config.validate() {
        error!("{}", e);
        process::exit(1);
    }

    let mut signals = match TerminationSignals::install() {
        Ok(signals) => signals,
        Err(e) => {
            error!("Unable to install signal handlers: {}", e);
            process::exit(1);
        }
    };

    info!(
        driver = %config.driver,
        pattern = %config.root_pattern,
        poll_ms = config.poll_interval.as_millis() as u64,
        "STARTUP: Configuration"
    );

    let worker = tokio::task::spawn_blocking(move || fan_control::regulate(&config, SysfsStore::new()));

    // Exit directly: runtime shutdown would block on the worker thread.
    tokio::select! {
        name = signals.recv() => {
            info!("SIGNAL: Received {} - exiting", name);
            process::exit(0);
        }
        joined = worker => {
            match joined {
                Ok(Ok(never)) => match never {},
                Ok(Err(e)) => error!("FATAL: {:#}", e),
                Err(e) if e.is_panic() => error!("FATAL: fan control worker panicked: {}", e),
                Err(e) => error!("FATAL: fan control worker stopped: {}", e),
            }
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_accepted() {
        assert!(check_privileges(0).is_ok());
    }

    #[test]
    fn test_regular_user_is_rejected() {
        let err = check_privileges(1000).unwrap_err();
        assert!(matches!(err, GpufanError::PermissionDenied(_)));
        assert!(err.to_string().contains("euid=1000"));
    }
}
