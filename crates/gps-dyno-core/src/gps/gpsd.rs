//! gpsd client
//!
//! Streams reports with `?WATCH` and keeps the latest TPV and SKY state.
//! Each poll drains whatever bytes are already buffered in the socket and
//! never waits for more.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::message::{GpsdMessage, Sky, Tpv};
use super::{sanitize_speed, FixQuality, GpsdError, Position, Satellites, SpeedSample, SpeedSource};
use crate::unit_conversion::{meters_to_feet, mps_to_mph};

/// Timeout for establishing the TCP connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Longest unterminated line kept while waiting for its newline
const MAX_LINE_BYTES: usize = 64 * 1024;

/// Protocol major version this client understands
const SUPPORTED_PROTO_MAJOR: u32 = 3;

const WATCH_ENABLE: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";
const WATCH_DISABLE: &[u8] = b"?WATCH={\"enable\":false};\n";

/// Client for the gpsd JSON socket protocol
///
/// Generic over the stream so tests can drive it without a daemon; the
/// stream must report [`io::ErrorKind::WouldBlock`] once drained.
pub struct GpsdClient<S: Read + Write = TcpStream> {
    /// Connection to the daemon
    stream: S,
    /// Bytes received but not yet split into lines
    buffer: Vec<u8>,
    /// Most recent position report
    tpv: Option<Tpv>,
    /// Most recent satellite counts
    satellites: Satellites,
    /// Set once the stream has failed; no further reads are attempted
    lost: bool,
}

impl GpsdClient<TcpStream> {
    /// Connect to a gpsd instance and start watching reports
    pub fn connect(host: &str, port: u16) -> Result<Self, GpsdError> {
        let addr = format!("{host}:{port}");
        let connection_failed = |source: io::Error| GpsdError::ConnectionFailed {
            addr: addr.clone(),
            source,
        };

        let mut last_err = io::Error::new(io::ErrorKind::NotFound, "no address resolved");
        let mut stream = None;
        for candidate in (host, port).to_socket_addrs().map_err(connection_failed)? {
            match TcpStream::connect_timeout(&candidate, CONNECT_TIMEOUT) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = e,
            }
        }
        let stream = stream.ok_or_else(|| connection_failed(last_err))?;

        let client = Self::from_stream(stream).map_err(|e| match e {
            GpsdError::Io(source) => connection_failed(source),
            other => other,
        })?;
        client
            .stream
            .set_nonblocking(true)
            .map_err(connection_failed)?;

        info!("Connected to gpsd at {}", addr);
        Ok(client)
    }
}

impl<S: Read + Write> GpsdClient<S> {
    /// Wrap an already-open stream and send the watch request
    pub fn from_stream(mut stream: S) -> Result<Self, GpsdError> {
        stream.write_all(WATCH_ENABLE)?;
        stream.flush()?;

        Ok(Self {
            stream,
            buffer: Vec::new(),
            tpv: None,
            satellites: Satellites::default(),
            lost: false,
        })
    }

    /// Whether the connection has failed
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Read everything currently available without blocking
    fn fill_buffer(&mut self) -> Result<(), GpsdError> {
        let mut chunk = [0u8; 4096];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(GpsdError::Closed),
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Handle every complete line in the buffer
    fn process_lines(&mut self) {
        while let Some(end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            if let Err(e) = self.handle_line(&line) {
                debug!("Skipping gpsd line: {}", e);
            }
        }

        if self.buffer.len() > MAX_LINE_BYTES {
            debug!(
                "Discarding {} bytes of unterminated gpsd data",
                self.buffer.len()
            );
            self.buffer.clear();
        }
    }

    fn handle_line(&mut self, line: &[u8]) -> Result<(), GpsdError> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        let message: GpsdMessage =
            serde_json::from_slice(line).map_err(|e| GpsdError::Protocol(e.to_string()))?;

        match message {
            GpsdMessage::Tpv(tpv) => self.tpv = Some(tpv),
            GpsdMessage::Sky(sky) => self.satellites = satellites_from(&sky),
            GpsdMessage::Version(version) => {
                if version.proto_major != SUPPORTED_PROTO_MAJOR {
                    warn!(
                        "gpsd {} speaks protocol {}.{}, expected {}.x",
                        version.release,
                        version.proto_major,
                        version.proto_minor,
                        SUPPORTED_PROTO_MAJOR
                    );
                } else {
                    debug!("gpsd release {}", version.release);
                }
            }
            GpsdMessage::Other => {}
        }
        Ok(())
    }

    /// Build a sample from the latest reports
    fn current_sample(&self) -> SpeedSample {
        let Some(tpv) = &self.tpv else {
            return SpeedSample {
                satellites: self.satellites,
                ..SpeedSample::no_data()
            };
        };

        let fix = FixQuality::from_mode(tpv.mode);
        if !fix.has_fix() {
            return SpeedSample {
                fix,
                satellites: self.satellites,
                fix_time: tpv.time,
                ..SpeedSample::no_data()
            };
        }

        let altitude_ft = match fix {
            FixQuality::Fix3D => tpv.alt_msl.or(tpv.alt).map(meters_to_feet),
            _ => None,
        };

        SpeedSample {
            speed_mph: sanitize_speed(tpv.speed.map(mps_to_mph).unwrap_or(0.0)),
            fix,
            position: tpv.lat.zip(tpv.lon).map(|(lat, lon)| Position { lat, lon }),
            altitude_ft,
            satellites: self.satellites,
            fix_time: tpv.time,
        }
    }
}

impl<S: Read + Write> SpeedSource for GpsdClient<S> {
    fn poll(&mut self) -> SpeedSample {
        if self.lost {
            return SpeedSample::no_data();
        }

        // Lines completed before the failure are still applied, but the
        // sample reports no data from here on
        let read = self.fill_buffer();
        self.process_lines();

        if let Err(e) = read {
            debug!("gpsd read failed, reporting no data: {}", e);
            self.lost = true;
            return SpeedSample::no_data();
        }

        self.current_sample()
    }
}

impl<S: Read + Write> Drop for GpsdClient<S> {
    fn drop(&mut self) {
        if !self.lost {
            // Best effort; the daemon also stops watching when the socket closes
            let _ = self.stream.write_all(WATCH_DISABLE);
        }
    }
}

fn satellites_from(sky: &Sky) -> Satellites {
    Satellites {
        visible: sky.visible(),
        used: sky.used(),
    }
}
