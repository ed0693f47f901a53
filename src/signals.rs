//! Process-wide signal suppression
//!
//! While locked, ordinary interrupt and terminate signals must not end the
//! session; only a non-ignorable kill or a controlling-terminal hangup can.
//! The policy is installed once and never removed before the process exits.

use tracing::debug;

/// Install an ignore disposition for every standard signal except `SIGHUP`.
///
/// `SIGHUP` keeps its default disposition: when the terminal itself goes
/// away there is nothing left to lock, and ignoring it would prevent
/// session cleanup. `SIGKILL` and `SIGSTOP` are in the range but the
/// kernel rejects changing them; the remaining registrations take effect.
#[cfg(unix)]
pub fn suppress_termination_signals() {
    for sig in 1..32 {
        if sig == libc::SIGHUP {
            continue;
        }
        unsafe {
            libc::signal(sig, libc::SIG_IGN);
        }
    }
    debug!("termination signals suppressed");
}

/// No POSIX signal range to suppress on this platform; raw mode already
/// stops Ctrl+C from reaching the process as a console event.
#[cfg(not(unix))]
pub fn suppress_termination_signals() {
    debug!("signal suppression not applicable on this platform");
}
