//! Unit Conversion Functions
//!
//! gpsd reports SI units; the dyno works in imperial ones:
//! - Speed: m/s ↔ mph, km/h ↔ mph
//! - Length: meters ↔ feet

/// Miles per hour in one meter per second
const MPH_PER_MPS: f64 = 2.2369362920544;

/// Miles per hour in one kilometer per hour
const MPH_PER_KMH: f64 = 0.62137119223733;

/// Feet in one meter
const FEET_PER_METER: f64 = 3.280839895013123;

/// Convert m/s to mph
pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPH_PER_MPS
}

/// Convert mph to m/s
pub fn mph_to_mps(mph: f64) -> f64 {
    mph / MPH_PER_MPS
}

/// Convert km/h to mph
pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * MPH_PER_KMH
}

/// Convert mph to km/h
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph / MPH_PER_KMH
}

/// Convert meters to feet
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Convert feet to meters
pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}
