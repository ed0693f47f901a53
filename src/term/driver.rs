//! Raw-mode terminal driver
//!
//! Owns the process-wide raw/cooked state of the controlling terminal.
//! Raw mode must be active before the lock screen is drawn: falling through
//! to a prompt with local echo enabled would display the typed password.

use crossterm::event::{self, Event};
use crossterm::terminal;
use tracing::debug;

use super::{keys, Result, TermError};

/// Terminal raw-mode guard.
///
/// `restore_mode` is idempotent and also runs on drop, so the prior
/// terminal configuration is reapplied on every exit path, including
/// early-return errors.
pub struct TerminalDriver {
    raw: bool,
}

impl TerminalDriver {
    pub fn new() -> Self {
        Self { raw: false }
    }

    /// Disable line buffering and local echo on the controlling terminal.
    ///
    /// The prior configuration is captured and held until `restore_mode`.
    /// Failure is fatal for the caller: no lock UI may be shown without
    /// raw mode.
    pub fn enter_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode().map_err(TermError::RawMode)?;
        self.raw = true;
        debug!("raw mode enabled");
        Ok(())
    }

    /// Block until a keypress arrives and return its raw input byte.
    ///
    /// Keys with no byte representation (modifiers, function keys,
    /// non-ASCII input, key releases) are skipped.
    pub fn read_key(&mut self) -> Result<u8> {
        loop {
            if let Event::Key(key) = event::read().map_err(TermError::Read)? {
                if let Some(byte) = keys::key_byte(&key) {
                    return Ok(byte);
                }
            }
        }
    }

    /// Reapply the configuration captured by `enter_raw_mode`.
    ///
    /// Safe to call any number of times; a no-op if raw mode was never
    /// entered.
    pub fn restore_mode(&mut self) {
        if !self.raw {
            return;
        }
        self.raw = false;
        let _ = terminal::disable_raw_mode();
        debug!("raw mode restored");
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }
}

impl Default for TerminalDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_without_enter_is_noop() {
        let mut driver = TerminalDriver::new();
        assert!(!driver.is_raw());
        // Must not touch the terminal when raw mode was never entered.
        driver.restore_mode();
        driver.restore_mode();
        assert!(!driver.is_raw());
    }
}
