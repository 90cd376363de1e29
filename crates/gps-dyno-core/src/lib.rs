//! # GPS Dyno Core Library
//!
//! Core functionality for the GPS dyno acceleration timer.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - The measurement engine (arming, rising-edge start detection, run timing)
//! - Wheel horsepower calculation from a timed speed interval
//! - Vehicle and test configuration loading
//! - A gpsd client adapter and a simulated speed source
//! - The per-tick session glue tying input, speed and engine together
//!
//! ## Example
//!
//! ```rust,ignore
//! use gps_dyno_core::prelude::*;
//!
//! let config = DynoConfig::from_file("config.json")?;
//! let gps = GpsdClient::connect(DEFAULT_GPSD_HOST, DEFAULT_GPSD_PORT)?;
//! let engine = MeasurementEngine::new(config.vehicle, config.test);
//! let mut session = Session::new(engine, gps, keyboard);
//!
//! while let TickOutcome::Continue(snapshot) = session.tick() {
//!     println!("{:.1} mph  {}", snapshot.speed_mph, snapshot.phase.label());
//! }
//! ```

pub mod config;
pub mod demo;
pub mod engine;
pub mod gps;
pub mod input;
pub mod performance;
pub mod session;
pub mod unit_conversion;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ConfigError, DynoConfig, TestThresholds, VehicleProfile};
    pub use crate::demo::DemoSource;
    pub use crate::engine::{MeasurementEngine, Phase, RunResult, RunState, Snapshot};
    pub use crate::gps::{
        FixQuality, GpsdClient, GpsdError, Position, Satellites, SpeedSample, SpeedSource,
        DEFAULT_GPSD_HOST, DEFAULT_GPSD_PORT,
    };
    pub use crate::input::{Command, InputSource};
    pub use crate::performance::wheel_hp;
    pub use crate::session::{Session, TickOutcome};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
