//! Lock screen rendering
//!
//! ANSI rendering of the lock artwork and the masked password field. Runs
//! on the alternate screen buffer so the user's shell content is hidden
//! while locked and restored afterwards.

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveTo, MoveToColumn, SetCursorStyle},
    execute, queue,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::debug;

use super::{Result, TermError};

/// Width of the visible password field, and thereby the maximum number of
/// password characters the UI accepts (a display limitation, not a
/// security policy).
pub const DISPLAY_WIDTH: usize = 16;

/// Each entered byte renders as two display characters.
const MASK_GLYPH: &str = " *";

/// Column of the masked field's fixed right edge. The field grows leftward
/// from here so the right edge never moves as characters come and go.
const FIELD_RIGHT_COL: u16 = (DISPLAY_WIDTH as u16) * 2;

const LOCK_ART: &[&str] = &[
    "         :+*@@@@@%+=",
    "       =@@@#+====*@@@*.",
    "    .*@@@.          +@@=",
    "    %@@.              %@@.",
    "    @@%               =@@-",
    "    @@@@@@@@@@@@@@@@@@@@@-",
    "    @@@#+%@@@@@@@@@@@@@@@-",
    "    @@@@=  `\\%@@@@@@@@@@@-",
    "    @@@@@@@>  >@@@@@@@@@@-",
    "    @@@%=  ./%@@@@@@@@@@@-",
    "    @@@#+@@@@@@________%@-",
    "    @@@@@@@@@@@@@@@@@@@@@-",
    "    #####################:",
    "",
    "",
    "",
    " |__________________________|",
];

/// Row of the masked password field, just above the bracket line.
const FIELD_ROW: u16 = (LOCK_ART.len() - 2) as u16;

/// Row where the verification outcome is printed, below the artwork.
const RESULT_ROW: u16 = (LOCK_ART.len() + 1) as u16;

/// Alternate-screen and cursor-style guard plus the lock UI drawing.
///
/// `exit_lock_screen` is idempotent and also runs on drop, mirroring the
/// raw-mode guard in `TerminalDriver`.
pub struct ScreenPresenter {
    active: bool,
}

impl ScreenPresenter {
    pub fn new() -> Self {
        Self { active: false }
    }

    /// Switch to the alternate screen buffer and a blinking-bar cursor.
    pub fn enter_lock_screen(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, SetCursorStyle::BlinkingBar)
            .map_err(TermError::Draw)?;
        self.active = true;
        debug!("entered alternate screen");
        Ok(())
    }

    /// Restore the default cursor style and the primary screen buffer.
    ///
    /// Idempotent; a no-op if the lock screen was never entered.
    pub fn exit_lock_screen(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let mut stdout = io::stdout();
        let _ = execute!(stdout, SetCursorStyle::DefaultUserShape, LeaveAlternateScreen);
        let _ = stdout.flush();
        debug!("left alternate screen");
    }

    /// Draw the lock artwork and park the cursor at the entry field.
    pub fn draw_lock_art(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, Clear(ClearType::All), MoveTo(0, 0)).map_err(TermError::Draw)?;
        for (row, line) in LOCK_ART.iter().enumerate() {
            queue!(stdout, MoveTo(0, row as u16)).map_err(TermError::Draw)?;
            write!(stdout, "{}", line).map_err(TermError::Draw)?;
        }
        queue!(stdout, MoveTo(FIELD_RIGHT_COL, FIELD_ROW)).map_err(TermError::Draw)?;
        stdout.flush().map_err(TermError::Draw)
    }

    /// Erase the input line and repaint `length` mask glyphs, right-aligned.
    ///
    /// Called after every keystroke. Erase-then-redraw keeps the line exact
    /// under trailing insertion and deletion; glyphs from the previous frame
    /// never survive.
    pub fn redraw_masked_field(&mut self, length: usize) -> Result<()> {
        let mut stdout = io::stdout();
        queue!(
            stdout,
            MoveTo(0, FIELD_ROW),
            Clear(ClearType::CurrentLine),
            MoveToColumn(field_start_column(length)),
        )
        .map_err(TermError::Draw)?;
        for _ in 0..length {
            write!(stdout, "{}", MASK_GLYPH).map_err(TermError::Draw)?;
        }
        stdout.flush().map_err(TermError::Draw)
    }

    /// Print the verification outcome below the artwork.
    ///
    /// With `reveal` set, the typed password is echoed back in cleartext,
    /// matching the historical behavior (see DESIGN.md).
    pub fn show_result(&mut self, entered: &[u8], matched: bool, reveal: bool) -> Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, MoveTo(0, RESULT_ROW), Clear(ClearType::FromCursorDown))
            .map_err(TermError::Draw)?;
        if reveal {
            write!(
                stdout,
                "Your password is: {}\r\n",
                String::from_utf8_lossy(entered)
            )
            .map_err(TermError::Draw)?;
        }
        let verdict = if matched {
            "This matches!"
        } else {
            "This does not match"
        };
        write!(stdout, "{}\r\n", verdict).map_err(TermError::Draw)?;
        stdout.flush().map_err(TermError::Draw)
    }
}

impl Default for ScreenPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScreenPresenter {
    fn drop(&mut self) {
        self.exit_lock_screen();
    }
}

/// Start column of the masked field for a given entered length.
fn field_start_column(length: usize) -> u16 {
    FIELD_RIGHT_COL.saturating_sub((length * MASK_GLYPH.len()) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_right_edge_stays_fixed() {
        for length in 0..DISPLAY_WIDTH {
            let start = field_start_column(length);
            assert_eq!(start + (length * MASK_GLYPH.len()) as u16, FIELD_RIGHT_COL);
        }
    }

    #[test]
    fn field_never_underflows_the_line() {
        // Maximum accepted length is DISPLAY_WIDTH - 1
        let start = field_start_column(DISPLAY_WIDTH - 1);
        assert!(start >= 2);
    }

    #[test]
    fn field_row_sits_above_bracket_line() {
        assert_eq!(LOCK_ART[FIELD_ROW as usize], "");
        assert!(LOCK_ART[FIELD_ROW as usize + 1].starts_with(" |"));
    }
}
