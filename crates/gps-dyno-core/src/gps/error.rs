//! gpsd errors

use std::io;
use thiserror::Error;

/// Errors that can occur talking to gpsd
///
/// Only [`GpsdError::ConnectionFailed`] reaches the caller of
/// [`GpsdClient::connect`](super::GpsdClient::connect); the rest are absorbed
/// into no-data samples while polling.
#[derive(Error, Debug)]
pub enum GpsdError {
    #[error("cannot connect to gpsd at {addr}: {source}")]
    ConnectionFailed {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("gpsd closed the connection")]
    Closed,

    #[error("protocol error: {0}")]
    Protocol(String),
}
