//! Terminal plumbing
//!
//! Raw mode is held by [`TerminalGuard`] for exactly as long as the tick
//! loop runs; the keyboard is read through crossterm's event queue.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use gps_dyno_core::input::{Command, InputSource};
use tracing::debug;

/// Keeps the terminal in raw mode with a hidden cursor until dropped
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Switch the terminal to raw mode
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Runs on every exit path, including unwinding; nothing useful to do
        // with a failure here
        let _ = execute!(io::stdout(), cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads at most one pending key per tick without blocking
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl InputSource for KeyboardInput {
    fn poll_command(&mut self) -> Command {
        match event::poll(Duration::ZERO) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => command_for(key),
                Ok(_) => Command::None,
                Err(e) => {
                    debug!("Keyboard read failed: {}", e);
                    Command::None
                }
            },
            Ok(false) => Command::None,
            Err(e) => {
                debug!("Keyboard poll failed: {}", e);
                Command::None
            }
        }
    }
}

/// Map a key event to a command
///
/// Raw mode delivers Ctrl-C as a key instead of SIGINT, so it is bound to quit.
fn command_for(key: KeyEvent) -> Command {
    if key.kind != KeyEventKind::Press {
        return Command::None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char(c) => Command::from_key(c),
        _ => Command::None,
    }
}
