//! Demo Mode - Simulated speed source for testing
//!
//! Drives a repeating cycle without a GPS receiver: sit stopped, accelerate
//! through the configured test window, cruise, brake back to a stop.
//! Simulated time advances a fixed interval per poll, so a seeded source is
//! fully deterministic.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use crate::config::TestThresholds;
use crate::gps::{sanitize_speed, FixQuality, Position, Satellites, SpeedSample, SpeedSource};

/// Default simulated time per poll (10 Hz)
const DEFAULT_TICK: Duration = Duration::from_millis(100);

const STOPPED_MS: u64 = 3000;
const CRUISE_MS: u64 = 3000;

/// mph gained per second under acceleration
const ACCEL_MPH_PER_SEC: f64 = 8.0;
/// mph lost per second under braking
const BRAKE_MPH_PER_SEC: f64 = 15.0;
/// How far past the end threshold the simulated car pulls
const OVERSHOOT_MPH: f64 = 5.0;
/// Peak-to-peak speed noise
const JITTER_MPH: f64 = 0.4;

const DEMO_POSITION: Position = Position {
    lat: 36.584_139,
    lon: -121.753_418,
};
const DEMO_ALTITUDE_FT: f64 = 810.0;

/// Simulated vehicle that repeatedly runs through the test window
pub struct DemoSource {
    /// Cruise speed, a little above the end threshold
    target_mph: f64,
    /// Simulated time added per poll (ms)
    tick_ms: u64,
    /// Simulated time since creation (ms)
    sim_time_ms: u64,
    /// Where in the drive cycle the car is
    drive_state: DriveState,
    /// Noise-free current speed
    speed_mph: f64,
    /// Random number generator for speed jitter
    rng: StdRng,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DriveState {
    /// Standing still
    Stopped { since_ms: u64 },
    /// Full throttle up to the target speed
    Accelerating,
    /// Holding the target speed
    Cruising { since_ms: u64 },
    /// Slowing to a stop
    Braking,
}

impl DemoSource {
    /// Create a demo source seeded from entropy
    pub fn new(thresholds: TestThresholds) -> Self {
        Self::from_rng(thresholds, StdRng::from_entropy())
    }

    /// Create a deterministic demo source
    pub fn with_seed(thresholds: TestThresholds, seed: u64) -> Self {
        Self::from_rng(thresholds, StdRng::seed_from_u64(seed))
    }

    fn from_rng(thresholds: TestThresholds, rng: StdRng) -> Self {
        Self {
            target_mph: thresholds.end_mph + OVERSHOOT_MPH,
            tick_ms: DEFAULT_TICK.as_millis() as u64,
            sim_time_ms: 0,
            drive_state: DriveState::Stopped { since_ms: 0 },
            speed_mph: 0.0,
            rng,
        }
    }

    /// Set the simulated time that passes per poll
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_ms = (interval.as_millis() as u64).max(1);
        self
    }

    /// Simulated time elapsed so far
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.sim_time_ms)
    }

    /// Length of one full stop-accelerate-cruise-brake cycle
    pub fn cycle_duration(&self) -> Duration {
        let accel_secs = self.target_mph / ACCEL_MPH_PER_SEC;
        let brake_secs = self.target_mph / BRAKE_MPH_PER_SEC;
        Duration::from_millis(STOPPED_MS + CRUISE_MS)
            + Duration::from_secs_f64(accel_secs + brake_secs)
    }

    /// Advance the drive cycle by one tick
    fn update(&mut self) {
        let dt = self.tick_ms as f64 / 1000.0;
        let now = self.sim_time_ms;

        match self.drive_state {
            DriveState::Stopped { since_ms } => {
                self.speed_mph = 0.0;
                if now >= since_ms + STOPPED_MS {
                    self.drive_state = DriveState::Accelerating;
                }
            }
            DriveState::Accelerating => {
                self.speed_mph = (self.speed_mph + ACCEL_MPH_PER_SEC * dt).min(self.target_mph);
                if self.speed_mph >= self.target_mph {
                    self.drive_state = DriveState::Cruising { since_ms: now };
                }
            }
            DriveState::Cruising { since_ms } => {
                if now >= since_ms + CRUISE_MS {
                    self.drive_state = DriveState::Braking;
                }
            }
            DriveState::Braking => {
                self.speed_mph = (self.speed_mph - BRAKE_MPH_PER_SEC * dt).max(0.0);
                if self.speed_mph <= 0.0 {
                    self.drive_state = DriveState::Stopped { since_ms: now };
                }
            }
        }

        self.sim_time_ms += self.tick_ms;
    }
}

impl SpeedSource for DemoSource {
    fn poll(&mut self) -> SpeedSample {
        self.update();

        let jitter = if self.speed_mph > 0.0 {
            self.rng.gen_range(-JITTER_MPH / 2.0..JITTER_MPH / 2.0)
        } else {
            0.0
        };

        SpeedSample {
            speed_mph: sanitize_speed(self.speed_mph + jitter),
            fix: FixQuality::Fix3D,
            position: Some(DEMO_POSITION),
            altitude_ft: Some(DEMO_ALTITUDE_FT),
            satellites: Satellites {
                visible: 12,
                used: 9,
            },
            fix_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> TestThresholds {
        TestThresholds {
            start_mph: 20.0,
            end_mph: 60.0,
        }
    }

    #[test]
    fn test_starts_stopped_with_fix() {
        let mut demo = DemoSource::with_seed(thresholds(), 1);
        let sample = demo.poll();
        assert_eq!(sample.speed_mph, 0.0);
        assert_eq!(sample.fix, FixQuality::Fix3D);
        assert!(sample.position.is_some());
    }

    #[test]
    fn test_reaches_past_end_threshold() {
        let mut demo = DemoSource::with_seed(thresholds(), 7);
        let ticks = demo.cycle_duration().as_millis() / 100;
        let peak = (0..ticks)
            .map(|_| demo.poll().speed_mph)
            .fold(0.0_f64, f64::max);
        assert!(peak >= 60.0, "peak {} never reached end threshold", peak);
        assert!(peak < 66.0, "peak {} overshot the target", peak);
    }

    #[test]
    fn test_same_seed_same_speeds() {
        let mut a = DemoSource::with_seed(thresholds(), 42);
        let mut b = DemoSource::with_seed(thresholds(), 42);
        for _ in 0..200 {
            assert_eq!(a.poll(), b.poll());
        }
    }

    #[test]
    fn test_tick_interval_advances_time() {
        let mut demo =
            DemoSource::with_seed(thresholds(), 3).with_tick_interval(Duration::from_millis(250));
        for _ in 0..4 {
            demo.poll();
        }
        assert_eq!(demo.elapsed(), Duration::from_secs(1));
    }
}
