//! Operator commands
//!
//! The keyboard is polled once per tick and yields at most one command.

use serde::{Deserialize, Serialize};

/// Operator command for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Command {
    /// No key, or a key with no binding
    #[default]
    None,
    /// Leave the tick loop
    Quit,
    /// Discard the current run and return to idle
    Reset,
}

impl Command {
    /// Map a pressed key to a command
    pub fn from_key(key: char) -> Self {
        match key {
            'q' => Command::Quit,
            'r' => Command::Reset,
            _ => Command::None,
        }
    }
}

/// A non-blocking producer of operator commands
pub trait InputSource {
    /// Return the pending command, or [`Command::None`] without waiting
    fn poll_command(&mut self) -> Command;
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll_command(&mut self) -> Command {
        (**self).poll_command()
    }
}
