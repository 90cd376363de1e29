//! Screen rendering
//!
//! Formats one engine snapshot per tick. Lines end in `\r\n` since the
//! terminal is in raw mode.

use std::fmt::Display;
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use gps_dyno_core::config::{TestThresholds, VehicleProfile};
use gps_dyno_core::engine::{Phase, Snapshot};
use gps_dyno_core::gps::FixQuality;

/// Redraw the whole screen for a snapshot
pub fn render<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    vehicle: &VehicleProfile,
    thresholds: &TestThresholds,
) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    line(out, "═══ GPS DYNO ═══")?;
    line(out, format!("Vehicle: {} ({} lbs)", vehicle.name, vehicle.weight_lbs))?;
    line(
        out,
        format!("Test: {} → {} mph", thresholds.start_mph, thresholds.end_mph),
    )?;
    line(out, "")?;

    render_gps(out, snapshot)?;
    line(out, "")?;

    let speed = format!("{:.1} mph", snapshot.speed_mph);
    let speed = match snapshot.phase {
        Phase::Complete => speed.blue(),
        Phase::Recording => speed.green(),
        _ if snapshot.speed_mph > 0.0 => speed.yellow(),
        _ => speed.reset(),
    };
    queue!(out, Print("Speed: "))?;
    line(out, speed)?;
    line(out, format!("Status: {}", snapshot.phase.label()))?;

    if let Some(elapsed) = snapshot.elapsed {
        line(out, format!("Elapsed: {:.2}s", elapsed.as_secs_f64()))?;
    }

    if let Some(result) = &snapshot.result {
        line(out, "")?;
        line(out, "═══ RESULTS ═══")?;
        line(out, format!("Time: {:.2} seconds", result.elapsed_secs))?;
        line(out, format!("Max Speed: {:.1} mph", result.max_speed_mph))?;
        line(out, format!("Wheel HP: {:.1} hp", result.wheel_hp))?;
    }

    line(out, "")?;
    line(out, "[Press 'q' to quit, 'r' to reset]")?;

    out.flush()
}

fn render_gps<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    let sats = snapshot.satellites;
    if !snapshot.fix.has_fix() {
        let status = format!(
            "GPS: {} | Sats: {} visible (waiting for fix...)",
            snapshot.fix.label(),
            sats.visible
        );
        return line(out, status.red());
    }

    let status = format!(
        "GPS: {} | Sats: {}/{}",
        snapshot.fix.label(),
        sats.used,
        sats.visible
    );
    line(out, status.green())?;

    if let Some(position) = snapshot.position {
        line(
            out,
            format!("Lat: {:.6}  Lon: {:.6}", position.lat, position.lon),
        )?;
    }
    if let (FixQuality::Fix3D, Some(altitude)) = (snapshot.fix, snapshot.altitude_ft) {
        line(out, format!("Alt: {:.0} ft", altitude))?;
    }
    Ok(())
}

fn line<W: Write>(out: &mut W, content: impl Display) -> io::Result<()> {
    queue!(out, Print(content), Print("\r\n"))
}
