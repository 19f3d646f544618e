//! Logger module
//!
//! Timestamped plain-text logging for the fixture server: info to stdout,
//! errors to stderr or a configured file. Mirrors the behavior the test
//! harness expects — responses with status >= 500 are always logged, the
//! rest only when access logging is enabled.

use crate::config::Config;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Error log file, when one is configured; stderr otherwise.
static ERROR_LOG: OnceLock<Mutex<File>> = OnceLock::new();

/// Initialize the logger. Should be called once at startup; only needed when
/// an error log file is configured.
pub fn init(config: &Config) -> io::Result<()> {
    let Some(path) = config.logging.error_log_file.as_deref() else {
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    ERROR_LOG.set(Mutex::new(file)).map_err(|_| {
        io::Error::new(io::ErrorKind::AlreadyExists, "Logger already initialized")
    })
}

fn timestamp() -> String {
    Local::now().format("%d/%b/%Y:%H:%M:%S %z").to_string()
}

fn write_info(message: &str) {
    println!("{message}");
}

fn write_error(message: &str) {
    match ERROR_LOG.get() {
        Some(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
        None => eprintln!("{message}"),
    }
}

/// Startup banner; the test harness scrapes this line for the port.
pub fn log_server_start(port: u16) {
    write_info(&format!("server running on http://localhost:{port}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[{}] [ERROR] {message}", timestamp()));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[{}] [WARN] {message}", timestamp()));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!(
        "[{}] [ERROR] Failed to serve connection: {err:?}",
        timestamp()
    ));
}

/// Opt-in per-request access line.
pub fn log_access(status: u16, method: &str, path: &str) {
    write_info(&format!("[{}] {status} {method} {path}", timestamp()));
}

/// Always-on error line for 5xx responses.
pub fn log_handler_error(status: u16, method: &str, path: &str) {
    write_error(&format!("[{}] [ERROR] {status} {method} {path}", timestamp()));
}
