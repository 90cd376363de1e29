//! gpsd Probe Tool
//!
//! A standalone tool to check that gpsd is reachable and reporting speed
//! before taking the car out. Prints one line per sample.
//!
//! Usage:
//!   cargo run --example gpsd_probe -- [OPTIONS]
//!
//! Options:
//!   --host HOST       gpsd host (default: 127.0.0.1)
//!   --port PORT       gpsd port (default: 2947)
//!   --seconds N       How long to sample (default: 10)
//!   --rate HZ         Samples per second (default: 2)

use gps_dyno_core::gps::{GpsdClient, SpeedSource, DEFAULT_GPSD_HOST, DEFAULT_GPSD_PORT};
use std::time::{Duration, Instant};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut host = DEFAULT_GPSD_HOST.to_string();
    let mut port = DEFAULT_GPSD_PORT;
    let mut seconds = 10u64;
    let mut rate_hz = 2u32;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                i += 1;
                if i < args.len() {
                    host = args[i].clone();
                }
            }
            "--port" => {
                i += 1;
                if i < args.len() {
                    port = args[i].parse().unwrap_or(DEFAULT_GPSD_PORT);
                }
            }
            "--seconds" => {
                i += 1;
                if i < args.len() {
                    seconds = args[i].parse().unwrap_or(10);
                }
            }
            "--rate" => {
                i += 1;
                if i < args.len() {
                    rate_hz = args[i].parse().unwrap_or(2).clamp(1, 50);
                }
            }
            "--help" | "-h" => {
                print_help();
                return;
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
            }
        }
        i += 1;
    }

    println!("Connecting to gpsd at {}:{}...", host, port);
    let mut gps = match GpsdClient::connect(&host, port) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   Make sure gpsd is running: sudo systemctl start gpsd");
            return;
        }
    };
    println!("✓ Connected, sampling for {}s at {} Hz", seconds, rate_hz);
    println!();
    println!("{:>7}  {:<8} {:>5}  {:>9}  {:>11} {:>12}  {:>8}", "t(s)", "fix", "sats", "speed", "lat", "lon", "alt(ft)");

    let interval = Duration::from_secs(1) / rate_hz;
    let start = Instant::now();
    let mut fixes = 0u32;
    let mut samples = 0u32;

    while start.elapsed() < Duration::from_secs(seconds) {
        let sample = gps.poll();
        samples += 1;
        if sample.fix.has_fix() {
            fixes += 1;
        }

        let (lat, lon) = sample
            .position
            .map(|p| (format!("{:.6}", p.lat), format!("{:.6}", p.lon)))
            .unwrap_or_else(|| ("-".into(), "-".into()));
        let alt = sample
            .altitude_ft
            .map(|a| format!("{:.0}", a))
            .unwrap_or_else(|| "-".into());

        println!(
            "{:>7.1}  {:<8} {:>2}/{:<2}  {:>5.1} mph  {:>11} {:>12}  {:>8}",
            start.elapsed().as_secs_f64(),
            sample.fix.label(),
            sample.satellites.used,
            sample.satellites.visible,
            sample.speed_mph,
            lat,
            lon,
            alt
        );

        if gps.is_lost() {
            eprintln!("❌ gpsd connection lost");
            return;
        }
        std::thread::sleep(interval);
    }

    println!();
    println!("{} of {} samples had a fix", fixes, samples);
}

fn print_help() {
    println!("gpsd probe - check gpsd speed reports");
    println!();
    println!("Usage: gpsd_probe [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host HOST       gpsd host (default: {})", DEFAULT_GPSD_HOST);
    println!("  --port PORT       gpsd port (default: {})", DEFAULT_GPSD_PORT);
    println!("  --seconds N       How long to sample (default: 10)");
    println!("  --rate HZ         Samples per second (default: 2)");
}
