//! Measurement Engine
//!
//! Turns the per-tick stream of speed samples and operator commands into a
//! run lifecycle: idle, waiting below the start threshold, recording,
//! complete. Timing only begins on a rising-edge crossing of the start
//! threshold, so a run is never started from a speed already above it.

mod snapshot;
mod state;

pub use snapshot::Snapshot;
pub use state::{Phase, RunResult, RunState};

use std::time::Instant;

use crate::config::{TestThresholds, VehicleProfile};
use crate::gps::SpeedSample;
use crate::input::Command;

/// Owns the run state for one session and advances it once per tick
#[derive(Debug, Clone)]
pub struct MeasurementEngine {
    vehicle: VehicleProfile,
    thresholds: TestThresholds,
    state: RunState,
}

impl MeasurementEngine {
    /// Create an idle engine for the given vehicle and test window
    pub fn new(vehicle: VehicleProfile, thresholds: TestThresholds) -> Self {
        Self {
            vehicle,
            thresholds,
            state: RunState::default(),
        }
    }

    /// Advance one tick using the current time
    pub fn step(&mut self, sample: SpeedSample, command: Command) -> Snapshot {
        self.step_at(sample, command, Instant::now())
    }

    /// Advance one tick at an explicit instant
    pub fn step_at(&mut self, sample: SpeedSample, command: Command, now: Instant) -> Snapshot {
        let state = std::mem::take(&mut self.state);
        self.state = state.advance(&sample, command, now, &self.vehicle, &self.thresholds);
        Snapshot::new(&self.state, sample, now)
    }

    /// Current run state
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Vehicle this engine measures
    pub fn vehicle(&self) -> &VehicleProfile {
        &self.vehicle
    }

    /// Test window this engine measures across
    pub fn thresholds(&self) -> &TestThresholds {
        &self.thresholds
    }
}
