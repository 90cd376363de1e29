//! Per-tick engine output

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use super::state::{Phase, RunResult, RunState};
use crate::gps::{sanitize_speed, FixQuality, Position, Satellites, SpeedSample};

/// Read-only view of the engine after a tick, handed to the presenter
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Phase after this tick
    pub phase: Phase,
    /// Speed used for this tick
    pub speed_mph: f64,
    /// Fix quality, passed through from the sample
    pub fix: FixQuality,
    /// Position, passed through from the sample
    pub position: Option<Position>,
    /// Altitude, passed through from the sample
    pub altitude_ft: Option<f64>,
    /// Satellite counts, passed through from the sample
    pub satellites: Satellites,
    /// Fix timestamp, passed through from the sample
    pub fix_time: Option<DateTime<Utc>>,
    /// Time into the current run; `Some` only while recording
    pub elapsed: Option<Duration>,
    /// Finished run; `Some` only while complete
    pub result: Option<RunResult>,
}

impl Snapshot {
    pub(crate) fn new(state: &RunState, sample: SpeedSample, now: Instant) -> Self {
        let result = match state.phase {
            Phase::Complete => state.last_result,
            _ => None,
        };

        Self {
            phase: state.phase,
            speed_mph: sanitize_speed(sample.speed_mph),
            fix: sample.fix,
            position: sample.position,
            altitude_ft: sample.altitude_ft,
            satellites: sample.satellites,
            fix_time: sample.fix_time,
            elapsed: state.elapsed(now),
            result,
        }
    }
}
