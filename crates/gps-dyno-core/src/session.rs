//! Tick glue
//!
//! One tick reads the operator command, polls the speed source and steps the
//! engine, strictly in that order. Timing of ticks belongs to the caller.

use std::time::Instant;

use tracing::info;

use crate::engine::{MeasurementEngine, Snapshot};
use crate::gps::SpeedSource;
use crate::input::{Command, InputSource};

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The engine was stepped; render this snapshot
    Continue(Snapshot),
    /// The operator asked to quit; the engine was not stepped
    Quit,
}

/// A measurement session: the engine plus its two input sources
pub struct Session<S, I> {
    engine: MeasurementEngine,
    speed: S,
    input: I,
}

impl<S: SpeedSource, I: InputSource> Session<S, I> {
    /// Create a session from an engine and its sources
    pub fn new(engine: MeasurementEngine, speed: S, input: I) -> Self {
        Self {
            engine,
            speed,
            input,
        }
    }

    /// Run one tick using the current time
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(Instant::now())
    }

    /// Run one tick at an explicit instant
    pub fn tick_at(&mut self, now: Instant) -> TickOutcome {
        let command = self.input.poll_command();
        if command == Command::Quit {
            info!("Quit requested");
            return TickOutcome::Quit;
        }

        let sample = self.speed.poll();
        TickOutcome::Continue(self.engine.step_at(sample, command, now))
    }

    /// The engine driven by this session
    pub fn engine(&self) -> &MeasurementEngine {
        &self.engine
    }

    /// Take the sources back, dropping the engine
    pub fn into_parts(self) -> (S, I) {
        (self.speed, self.input)
    }
}
