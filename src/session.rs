//! The interactive lock session
//!
//! State machine: Init -> Locked (masked entry loop) -> Verifying -> Done.
//! The session exclusively owns the password buffer, the loaded digest and
//! the terminal guards; there is no background activity, and the only
//! suspension point is the blocking keypress read.

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::signals;
use crate::store::{self, CredentialStore, StoreError, StoredDigest};
use crate::term::{ScreenPresenter, TermError, TerminalDriver, DISPLAY_WIDTH};

/// What a raw input byte means to the entry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// CR or LF: commit the entered password
    Commit,
    /// Backspace or form feed: erase the trailing character
    Erase,
    /// Anything else: append to the buffer
    Input(u8),
}

pub fn classify(byte: u8) -> KeyClass {
    match byte {
        b'\r' | b'\n' => KeyClass::Commit,
        0x08 | 0x0c => KeyClass::Erase,
        other => KeyClass::Input(other),
    }
}

/// Accumulator for the typed password.
///
/// Length stays within `[0, DISPLAY_WIDTH - 1]`: erasing at zero is a
/// no-op and appending at the bound discards the keystroke. Editing is
/// strictly at the end of the buffer.
#[derive(Default)]
pub struct PasswordBuffer {
    bytes: Vec<u8>,
}

impl PasswordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Append one byte, unless the display bound is already reached.
    pub fn push(&mut self, byte: u8) {
        if self.bytes.len() >= DISPLAY_WIDTH - 1 {
            return;
        }
        self.bytes.push(byte);
    }

    /// Erase the trailing byte; a no-op when empty.
    pub fn pop(&mut self) {
        self.bytes.pop();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[derive(Error, Debug)]
pub enum LockError {
    #[error(transparent)]
    Terminal(#[from] TermError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One lock of the current terminal.
pub struct LockSession {
    // Declared before the driver so the screen unwinds first on drop,
    // matching the enter order (raw mode, then alternate screen).
    screen: ScreenPresenter,
    driver: TerminalDriver,
    buffer: PasswordBuffer,
    stored: StoredDigest,
    reveal_password: bool,
}

impl LockSession {
    /// Load the stored digest and prepare a session.
    ///
    /// All fallible setup that can run before any terminal change happens
    /// here; a missing credential file aborts before the lock is shown.
    pub fn new(store: &CredentialStore, config: &Config) -> Result<Self, LockError> {
        let stored = store.load_digest()?;
        Ok(Self {
            screen: ScreenPresenter::new(),
            driver: TerminalDriver::new(),
            buffer: PasswordBuffer::new(),
            stored,
            reveal_password: config.reveal_password,
        })
    }

    /// Run the lock to completion.
    ///
    /// Returns whether the entered password matched. The exit status of the
    /// process does not depend on the answer; only setup errors are fatal.
    pub fn run(&mut self) -> Result<bool, LockError> {
        self.driver.enter_raw_mode()?;
        signals::suppress_termination_signals();
        self.screen.enter_lock_screen()?;
        self.screen.draw_lock_art()?;
        info!("terminal locked");

        loop {
            self.screen.redraw_masked_field(self.buffer.len())?;
            let byte = self.driver.read_key()?;
            match classify(byte) {
                KeyClass::Commit => break,
                KeyClass::Erase => self.buffer.pop(),
                KeyClass::Input(b) => self.buffer.push(b),
            }
        }

        let matched = store::digest(self.buffer.as_bytes()) == self.stored;
        info!(matched, "password verified");
        self.screen
            .show_result(self.buffer.as_bytes(), matched, self.reveal_password)?;

        // One acknowledgement keypress before the screen is handed back.
        self.driver.read_key()?;

        self.screen.exit_lock_screen();
        self.driver.restore_mode();
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a byte sequence through the entry-loop rules, stopping at the
    /// first commit byte. Returns the buffer.
    fn type_bytes(bytes: &[u8]) -> PasswordBuffer {
        let mut buffer = PasswordBuffer::new();
        for &b in bytes {
            match classify(b) {
                KeyClass::Commit => break,
                KeyClass::Erase => buffer.pop(),
                KeyClass::Input(b) => buffer.push(b),
            }
        }
        buffer
    }

    #[test]
    fn classify_commit_and_erase_bytes() {
        assert_eq!(classify(b'\r'), KeyClass::Commit);
        assert_eq!(classify(b'\n'), KeyClass::Commit);
        assert_eq!(classify(0x08), KeyClass::Erase);
        assert_eq!(classify(0x0c), KeyClass::Erase);
        assert_eq!(classify(b'a'), KeyClass::Input(b'a'));
        assert_eq!(classify(b' '), KeyClass::Input(b' '));
    }

    #[test]
    fn append_and_erase_are_order_sensitive() {
        let buffer = type_bytes(b"abc\x08d");
        assert_eq!(buffer.as_bytes(), b"abd");

        let buffer = type_bytes(b"ab\x08\x08\x08c");
        assert_eq!(buffer.as_bytes(), b"c");
    }

    #[test]
    fn erase_on_empty_buffer_is_noop() {
        let mut buffer = PasswordBuffer::new();
        buffer.pop();
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn length_clamps_at_display_bound() {
        let mut buffer = PasswordBuffer::new();
        for _ in 0..DISPLAY_WIDTH * 2 {
            buffer.push(b'x');
        }
        assert_eq!(buffer.len(), DISPLAY_WIDTH - 1);

        // The overflowing keystroke was discarded, not queued
        buffer.pop();
        assert_eq!(buffer.len(), DISPLAY_WIDTH - 2);
        buffer.push(b'y');
        assert_eq!(buffer.as_bytes()[DISPLAY_WIDTH - 2], b'y');
    }

    #[test]
    fn correct_password_matches_stored_digest() {
        let stored = store::digest(b"secret123");
        let buffer = type_bytes(b"secret123\r");
        assert_eq!(store::digest(buffer.as_bytes()), stored);
    }

    #[test]
    fn wrong_password_does_not_match() {
        let stored = store::digest(b"secret123");
        let buffer = type_bytes(b"wrongpass\r");
        assert_ne!(store::digest(buffer.as_bytes()), stored);
    }

    #[test]
    fn bytes_after_commit_are_ignored() {
        let buffer = type_bytes(b"abc\rdef");
        assert_eq!(buffer.as_bytes(), b"abc");
    }
}
