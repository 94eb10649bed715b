//! Control loop
//!
//! sample -> decide -> actuate -> sleep, forever. The force-cooling flag is
//! owned here and is the only state carried between iterations.

use std::convert::Infallible;
use std::thread;
use std::time::Duration;

use gf_error::Result;
use tracing::{debug, info};

use super::policy::{CoolingDecision, CoolingPolicy};
use crate::hw::{current_temperature, enable_manual_control, set_speed, AttributeStore, SensorRoot, SpeedChange};

/// Result of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub temperature: u32,
    pub decision: CoolingDecision,
    pub change: SpeedChange,
}

pub struct Controller<S> {
    store: S,
    root: SensorRoot,
    policy: CoolingPolicy,
    poll_interval: Duration,
    force_cooling: bool,
}

impl<S: AttributeStore> Controller<S> {
    /// Take manual control of the fan and seed the flag from one sample
    pub fn start(store: S, root: SensorRoot, policy: CoolingPolicy, poll_interval: Duration) -> Result<Self> {
        enable_manual_control(&store, &root)?;

        let temp = current_temperature(&store, &root)?;
        let force_cooling = policy.initial_force_cooling(temp);
        info!(root = %root, temp, force_cooling, "Fan controller started");

        Ok(Self {
            store,
            root,
            policy,
            poll_interval,
            force_cooling,
        })
    }

    pub fn force_cooling(&self) -> bool {
        self.force_cooling
    }

    pub fn root(&self) -> &SensorRoot {
        &self.root
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One iteration without the sleep
    pub fn step(&mut self) -> Result<Tick> {
        let temp = current_temperature(&self.store, &self.root)?;
        let decision = self.policy.decide(temp, self.force_cooling);
        let change = set_speed(&self.store, &self.root, decision.level)?;

        if decision.force_cooling != self.force_cooling {
            info!(
                temp,
                level = decision.level,
                regime = %decision.regime,
                "Force cooling {}",
                if decision.force_cooling { "engaged" } else { "released" }
            );
        }
        debug!(temp, level = decision.level, regime = %decision.regime, ?change, "Control tick");

        self.force_cooling = decision.force_cooling;
        Ok(Tick {
            temperature: temp,
            decision,
            change,
        })
    }

    /// Run until an attribute operation fails
    pub fn run(mut self) -> Result<Infallible> {
        info!(interval_ms = self.poll_interval.as_millis() as u64, "Entering control loop");
        loop {
            self.step()?;
            thread::sleep(self.poll_interval);
        }
    }
}
