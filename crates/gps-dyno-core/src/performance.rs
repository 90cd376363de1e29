//! Performance calculation
//!
//! Estimates power at the wheels from the kinetic energy gained over a
//! timed speed interval.

/// Folds the mph² → (ft/s)², lbs → slugs and ft·lbf/s → hp conversions
/// into a single divisor.
const HP_DIVISOR: f64 = 750.0;

/// Calculate wheel horsepower for a run from `start_mph` to `end_mph`
///
/// `hp = weight_lbs × (end_mph² − start_mph²) / (elapsed_secs × 750)`
///
/// Returns `0.0` when `elapsed_secs` is zero or negative.
pub fn wheel_hp(weight_lbs: f64, start_mph: f64, end_mph: f64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    weight_lbs * (end_mph.powi(2) - start_mph.powi(2)) / (elapsed_secs * HP_DIVISOR)
}
