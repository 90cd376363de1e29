//! gpsd JSON report types
//!
//! Only the fields the dyno reads are modeled; everything else in a report
//! is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single line from the gpsd socket, keyed by its `class`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "class")]
pub enum GpsdMessage {
    /// Time-position-velocity report
    #[serde(rename = "TPV")]
    Tpv(Tpv),
    /// Satellite view report
    #[serde(rename = "SKY")]
    Sky(Sky),
    /// Daemon version banner, sent on connect
    #[serde(rename = "VERSION")]
    Version(Version),
    /// DEVICES, WATCH, ERROR and anything else
    #[serde(other)]
    Other,
}

/// Time-position-velocity report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tpv {
    /// 0 unknown, 1 no fix, 2 2D, 3 3D
    #[serde(default)]
    pub mode: u8,
    /// Fix timestamp
    pub time: Option<DateTime<Utc>>,
    /// Latitude, degrees
    pub lat: Option<f64>,
    /// Longitude, degrees
    pub lon: Option<f64>,
    /// Altitude, meters (older daemons)
    pub alt: Option<f64>,
    /// Altitude above mean sea level, meters
    #[serde(rename = "altMSL")]
    pub alt_msl: Option<f64>,
    /// Ground speed, m/s
    pub speed: Option<f64>,
}

/// Satellite view report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sky {
    /// Satellites in view, when the daemon reports the count directly
    #[serde(rename = "nSat")]
    pub n_sat: Option<u32>,
    /// Satellites used, when the daemon reports the count directly
    #[serde(rename = "uSat")]
    pub u_sat: Option<u32>,
    /// Per-satellite detail
    #[serde(default)]
    pub satellites: Vec<SkySatellite>,
}

impl Sky {
    /// Satellites in view, falling back to the length of the satellite list
    pub fn visible(&self) -> u32 {
        self.n_sat
            .unwrap_or_else(|| u32::try_from(self.satellites.len()).unwrap_or(u32::MAX))
    }

    /// Satellites used, falling back to counting `used` entries
    pub fn used(&self) -> u32 {
        self.u_sat.unwrap_or_else(|| {
            let used = self.satellites.iter().filter(|s| s.used).count();
            u32::try_from(used).unwrap_or(u32::MAX)
        })
    }
}

/// One entry of a sky report's satellite list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkySatellite {
    /// Whether the satellite is part of the current solution
    #[serde(default)]
    pub used: bool,
}

/// Daemon version banner
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Version {
    /// Release string, e.g. "3.25"
    #[serde(default)]
    pub release: String,
    /// Protocol major version
    #[serde(default)]
    pub proto_major: u32,
    /// Protocol minor version
    #[serde(default)]
    pub proto_minor: u32,
}
