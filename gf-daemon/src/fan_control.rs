//! Fan control worker
//!
//! Discovery, manual mode and the control loop, run back to back on a
//! blocking thread. The worker only returns on failure.

use std::convert::Infallible;

use anyhow::Context;
use gf_core::{AttributeStore, ControlConfig, Controller};
use tracing::info;

/// Find the GPU, take over its fan and regulate forever
pub fn regulate<S: AttributeStore>(config: &ControlConfig, store: S) -> anyhow::Result<Infallible> {
    let root = config
        .discovery()
        .find_root(&store)
        .with_context(|| format!("Unable to find the '{}' hwmon device", config.driver))?;

    let controller = Controller::start(store, root.clone(), config.policy, config.poll_interval)
        .with_context(|| format!("Unable to take control of the fan at {}", root))?;

    info!(root = %root, "Regulating junction temperature");
    let never = controller
        .run()
        .with_context(|| format!("Fan control failed at {}", root))?;
    match never {}
}
