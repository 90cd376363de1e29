//! GPS speed acquisition
//!
//! Speed samples come from the gpsd location daemon over its JSON socket
//! protocol. Read failures never surface as errors once connected; they are
//! folded into a [`FixQuality::NoData`] sample so the engine has a single way
//! to react to missing data.

mod error;
mod gpsd;
mod message;

pub use error::GpsdError;
pub use gpsd::GpsdClient;
pub use message::{GpsdMessage, Sky, SkySatellite, Tpv, Version};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default gpsd host
pub const DEFAULT_GPSD_HOST: &str = "127.0.0.1";

/// Default gpsd TCP port
pub const DEFAULT_GPSD_PORT: u16 = 2947;

/// Quality of the current position/velocity solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FixQuality {
    /// Nothing usable from the daemon
    #[default]
    NoData,
    /// Receiver is reporting but has no solution
    NoFix,
    /// Latitude/longitude solution
    Fix2D,
    /// Latitude/longitude/altitude solution
    Fix3D,
}

impl FixQuality {
    /// Map a gpsd `mode` value
    pub fn from_mode(mode: u8) -> Self {
        match mode {
            1 => FixQuality::NoFix,
            2 => FixQuality::Fix2D,
            3 => FixQuality::Fix3D,
            _ => FixQuality::NoData,
        }
    }

    /// Whether speed and position are valid at this quality
    pub fn has_fix(self) -> bool {
        matches!(self, FixQuality::Fix2D | FixQuality::Fix3D)
    }

    /// Short display name
    pub fn label(self) -> &'static str {
        match self {
            FixQuality::NoData => "No data",
            FixQuality::NoFix => "No fix",
            FixQuality::Fix2D => "2D fix",
            FixQuality::Fix3D => "3D fix",
        }
    }
}

/// Latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude, degrees north
    pub lat: f64,
    /// Longitude, degrees east
    pub lon: f64,
}

/// Satellite counts from the most recent sky report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Satellites {
    /// Satellites in view
    pub visible: u32,
    /// Satellites used in the solution
    pub used: u32,
}

/// One speed reading, produced once per tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeedSample {
    /// Ground speed in mph, zero without a fix
    pub speed_mph: f64,
    /// Solution quality
    pub fix: FixQuality,
    /// Present for 2D and 3D fixes
    pub position: Option<Position>,
    /// Present for 3D fixes only
    pub altitude_ft: Option<f64>,
    /// Satellite counts, display only
    pub satellites: Satellites,
    /// Receiver timestamp of the fix, display only
    pub fix_time: Option<DateTime<Utc>>,
}

impl SpeedSample {
    /// The sample used whenever nothing usable was read
    pub fn no_data() -> Self {
        Self::default()
    }

    /// A fixed-quality sample at the given speed, without position
    pub fn with_speed(speed_mph: f64) -> Self {
        Self {
            speed_mph: sanitize_speed(speed_mph),
            fix: FixQuality::Fix3D,
            ..Self::default()
        }
    }
}

/// Clamp a reported speed into the range the engine accepts
pub(crate) fn sanitize_speed(speed_mph: f64) -> f64 {
    if speed_mph.is_finite() && speed_mph > 0.0 {
        speed_mph
    } else {
        0.0
    }
}

/// A non-blocking producer of speed samples
pub trait SpeedSource {
    /// Return the latest sample without waiting for new data
    fn poll(&mut self) -> SpeedSample;
}

impl<T: SpeedSource + ?Sized> SpeedSource for Box<T> {
    fn poll(&mut self) -> SpeedSample {
        (**self).poll()
    }
}
