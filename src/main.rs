//! termlock - lock the current terminal behind a password prompt
//!
//! termlock hides the running shell behind an alternate-screen lock until
//! the password whose SHA-256 digest is stored in `~/.lockfile/pwd.bin` is
//! typed. Input is read byte-at-a-time in raw mode and rendered as a
//! masked field; ordinary termination signals are ignored while locked.
//!
//! # Quick Start
//!
//! ```text
//! termlock           # Lock the terminal (the digest file must exist)
//! ```
//!
//! The digest file holds exactly 32 raw bytes. There is no enrollment mode
//! yet; create the file externally, e.g.:
//!
//! ```text
//! printf '%s' 'secret123' | sha256sum | cut -d' ' -f1 | xxd -r -p > ~/.lockfile/pwd.bin
//! ```

mod config;
mod session;
mod signals;
mod store;
mod term;

use std::env;
use std::process;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::session::{LockError, LockSession};
use crate::store::CredentialStore;

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("termlock {}", VERSION);
}

fn print_help() {
    eprintln!("termlock {} - lock the current terminal behind a password prompt", VERSION);
    eprintln!();
    eprintln!("Usage: termlock [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("While locked: type the password and press Enter. Backspace");
    eprintln!("erases; Ctrl+C and friends are ignored.");
    eprintln!();
    eprintln!("Credential file: ~/.lockfile/pwd.bin (32 raw bytes, SHA-256)");
    eprintln!("Configuration:   ~/.lockfile/config.toml");
}

fn parse_args() {
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                process::exit(0);
            }
            // Remaining arguments are accepted but inert, reserved for a
            // future enrollment (set-password) mode.
            _ => {}
        }
    }
}

/// Initialize logging to a file inside the storage directory.
///
/// The lock screen owns stdout, so logs never go to the terminal.
fn init_logging(store: &CredentialStore) {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(store.log_path())
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn run_lock(config: &Config) -> Result<bool, LockError> {
    let store = CredentialStore::open_default()?;
    store.ensure_storage_dir()?;
    init_logging(&store);
    info!("termlock {} starting", VERSION);

    let mut session = LockSession::new(&store, config)?;
    session.run()
}

fn main() {
    parse_args();
    let config = Config::load();

    match run_lock(&config) {
        Ok(matched) => {
            info!(matched, "termlock done");
        }
        Err(err) => {
            // The session and its guards were dropped inside run_lock, so
            // the terminal is already restored when this prints.
            error!("fatal: {}", err);
            eprintln!("{}", err);
            let code = match &err {
                LockError::Terminal(e) => e.os_code().unwrap_or(1),
                LockError::Store(_) => -1,
            };
            process::exit(code);
        }
    }
}
