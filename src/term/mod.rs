//! Terminal control: raw input mode, key decoding, lock screen rendering.

mod driver;
mod keys;
mod screen;

pub use driver::TerminalDriver;
pub use keys::key_byte;
pub use screen::{ScreenPresenter, DISPLAY_WIDTH};

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TermError {
    #[error("failed to query or set terminal attributes: {0}")]
    RawMode(#[source] io::Error),

    #[error("failed to read terminal input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write to terminal: {0}")]
    Draw(#[source] io::Error),
}

impl TermError {
    /// The OS error code behind this failure, when the platform reported one.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            TermError::RawMode(e) | TermError::Read(e) | TermError::Draw(e) => e.raw_os_error(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TermError>;
