//! Run state and the tick transition function

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{TestThresholds, VehicleProfile};
use crate::gps::{sanitize_speed, SpeedSample};
use crate::input::Command;
use crate::performance::wheel_hp;

/// Lifecycle phase of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for speed to rise through the start threshold
    #[default]
    Idle,
    /// Speed was already at or above the start threshold; it must drop
    /// below before a run can begin
    WaitingBelowStart,
    /// Timing a run
    Recording,
    /// A run finished; held until reset
    Complete,
}

impl Phase {
    /// Status text shown to the operator
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "IDLE - Accelerate past start speed to begin",
            Phase::WaitingBelowStart => "WAITING - Get below start speed, then accelerate",
            Phase::Recording => "RECORDING...",
            Phase::Complete => "COMPLETE",
        }
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Time from the start crossing to the end crossing
    pub elapsed_secs: f64,
    /// Highest speed seen while recording
    pub max_speed_mph: f64,
    /// Estimated wheel horsepower
    pub wheel_hp: f64,
}

/// Mutable state of the measurement engine
///
/// `start` is set exactly while recording and stays set, unused, once the
/// run completes. `max_speed_seen` only means something while recording or
/// complete, and never decreases while recording.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunState {
    /// Current phase
    pub phase: Phase,
    /// Speed from the previous tick, used for edge detection
    pub previous_speed: Option<f64>,
    /// When the current run crossed the start threshold
    pub start: Option<Instant>,
    /// Running maximum speed for the current run
    pub max_speed_seen: f64,
    /// Result of the last completed run
    pub last_result: Option<RunResult>,
}

impl RunState {
    /// Compute the state after one tick
    ///
    /// A reset clears the run back to idle, then the tick's sample is
    /// evaluated from there and becomes the next tick's previous speed.
    pub fn advance(
        mut self,
        sample: &SpeedSample,
        command: Command,
        now: Instant,
        vehicle: &VehicleProfile,
        thresholds: &TestThresholds,
    ) -> RunState {
        if command == Command::Reset {
            info!("Run reset from {:?}", self.phase);
            self = RunState::default();
        }

        let speed = sanitize_speed(sample.speed_mph);

        if self.phase == Phase::Recording {
            self.max_speed_seen = self.max_speed_seen.max(speed);
        }

        let next = match self.phase {
            Phase::Idle if speed >= thresholds.start_mph => match self.previous_speed {
                Some(previous) if previous < thresholds.start_mph => {
                    info!("Run started at {:.1} mph", speed);
                    self.start = Some(now);
                    self.max_speed_seen = speed;
                    Phase::Recording
                }
                _ => Phase::WaitingBelowStart,
            },
            Phase::WaitingBelowStart if speed < thresholds.start_mph => Phase::Idle,
            Phase::Recording if speed >= thresholds.end_mph => {
                let elapsed = self
                    .start
                    .map(|start| now.saturating_duration_since(start))
                    .unwrap_or_default()
                    .as_secs_f64();
                let result = RunResult {
                    elapsed_secs: elapsed,
                    max_speed_mph: self.max_speed_seen,
                    wheel_hp: wheel_hp(
                        vehicle.weight_lbs,
                        thresholds.start_mph,
                        thresholds.end_mph,
                        elapsed,
                    ),
                };
                info!(
                    "Run complete: {:.2}s, max {:.1} mph, {:.1} whp",
                    result.elapsed_secs, result.max_speed_mph, result.wheel_hp
                );
                self.last_result = Some(result);
                Phase::Complete
            }
            phase => phase,
        };

        if next != self.phase {
            debug!("Phase {:?} -> {:?} at {:.1} mph", self.phase, next, speed);
        }

        self.phase = next;
        self.previous_speed = Some(speed);
        self
    }

    /// Time since the start crossing, while recording
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        match (self.phase, self.start) {
            (Phase::Recording, Some(start)) => Some(now.saturating_duration_since(start)),
            _ => None,
        }
    }
}
