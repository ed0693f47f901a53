//! Key event to input byte translation
//!
//! The lock session consumes single raw bytes, the way a byte-at-a-time
//! `getchar` loop would. This maps a crossterm key event onto that byte.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translate a key event into the raw byte the session loop consumes.
///
/// Returns `None` for key releases/repeats and for keys with no single-byte
/// representation.
pub fn key_byte(event: &KeyEvent) -> Option<u8> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    match event.code {
        KeyCode::Enter => Some(b'\r'),
        KeyCode::Backspace => Some(0x08),
        KeyCode::Tab => Some(b'\t'),
        KeyCode::Esc => Some(0x1b),
        KeyCode::Char(c) => {
            if event.modifiers.contains(KeyModifiers::CONTROL) {
                // Ctrl+A..Ctrl+Z map to control bytes 0x01..0x1A
                let c = c.to_ascii_lowercase();
                if c.is_ascii_lowercase() {
                    Some(c as u8 - b'a' + 1)
                } else {
                    None
                }
            } else if c.is_ascii() {
                Some(c as u8)
            } else {
                None
            }
        }
        _ => None,
    }
}
