//! GPS Dyno
//!
//! Times acceleration between two speeds from gpsd fixes and estimates wheel
//! horsepower. Press `r` to reset a run and `q` to quit.

mod display;
mod terminal;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::tty::IsTty;
use gps_dyno_core::prelude::*;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use terminal::{KeyboardInput, TerminalGuard};

/// Measure acceleration time and wheel horsepower using GPS speed
#[derive(Parser, Debug)]
#[command(name = "gps-dyno", version, about)]
struct Args {
    /// Config file (default: ./config.json, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// gpsd host
    #[arg(long, default_value = DEFAULT_GPSD_HOST)]
    host: String,

    /// gpsd port
    #[arg(long, default_value_t = DEFAULT_GPSD_PORT)]
    port: u16,

    /// Use a simulated car instead of gpsd
    #[arg(long)]
    demo: bool,

    /// Screen and sampling rate in Hz
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
    rate_hz: u32,

    /// Log at debug level unless RUST_LOG is set. Only honoured when stderr
    /// is redirected away from the terminal (e.g. `2>dyno.log`)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => {
            println!("\nGoodbye!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            if e.chain().any(|cause| cause.is::<GpsdError>()) {
                eprintln!("Make sure gpsd is running: sudo systemctl start gpsd");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let stderr_is_tty = io::stderr().is_tty();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose, stderr_is_tty)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    if verbose && stderr_is_tty {
        warn!("--verbose ignored: stderr is the terminal; redirect it to a file");
    }
}

/// Debug lines written to the raw-mode screen would tear the display, so
/// they are only enabled when stderr goes somewhere else
fn default_log_level(verbose: bool, stderr_is_tty: bool) -> &'static str {
    if verbose && !stderr_is_tty {
        "debug"
    } else {
        "warn"
    }
}

async fn run(args: Args) -> Result<()> {
    let config_path = DynoConfig::resolve_path(args.config.as_deref());
    let config = DynoConfig::from_file(&config_path).context("failed to load configuration")?;
    info!(
        "Loaded {}: {} ({} lbs), {} -> {} mph",
        config_path.display(),
        config.vehicle.name,
        config.vehicle.weight_lbs,
        config.test.start_mph,
        config.test.end_mph
    );

    let tick = Duration::from_secs(1) / args.rate_hz;

    let speed: Box<dyn SpeedSource> = if args.demo {
        info!("Demo mode, no gpsd connection");
        Box::new(DemoSource::new(config.test).with_tick_interval(tick))
    } else {
        let client = GpsdClient::connect(&args.host, args.port)
            .context("failed to connect to gpsd")?;
        Box::new(client)
    };

    let vehicle = config.vehicle.clone();
    let thresholds = config.test;
    let engine = MeasurementEngine::new(config.vehicle, config.test);
    let mut session = Session::new(engine, speed, KeyboardInput);

    // Last fallible startup step; from here the guard restores the terminal
    // on every exit path
    let _terminal = TerminalGuard::acquire().context("failed to set up the terminal")?;

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut stdout = io::stdout();
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            _ = interval.tick() => {
                match session.tick() {
                    TickOutcome::Quit => break,
                    TickOutcome::Continue(snapshot) => {
                        display::render(&mut stdout, &snapshot, &vehicle, &thresholds)
                            .context("failed to draw the screen")?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Resolve when the process is asked to stop
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let streams = signal(SignalKind::terminate()).and_then(|term| {
            signal(SignalKind::hangup()).map(|hup| (term, hup))
        });
        match streams {
            Ok((mut term, mut hup)) => {
                tokio::select! {
                    _ = term.recv() => {}
                    _ = hup.recv() => {}
                }
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM/SIGHUP: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
