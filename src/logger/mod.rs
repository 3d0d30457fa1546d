//! Logger module
//!
//! Console output for the server:
//! - Lifecycle messages (startup, shutdown, bind failures) on stdout
//! - Access log in Common Log Format on stderr
//! - Errors and warnings on stderr

mod format;

pub use format::{version_label, AccessLogEntry};

use std::net::SocketAddr;

/// Write to the user-facing console
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

/// Write to access log
fn write_access(message: &str) {
    eprintln!("{message}");
}

pub fn log_server_start(url: &str, addr: &SocketAddr, root: &std::path::Path) {
    write_info(&format!("Server started at {url}"));
    write_info(&format!("Listening on {addr}, serving {}", root.display()));
    write_info("Policy headers enabled for web playback SDK embedding");
    write_info("Press Ctrl+C to stop");
}

pub fn log_server_stopped() {
    write_info("\nServer stopped");
}

pub fn log_invalid_port(value: &str, fallback: u16) {
    write_info(&invalid_port_message(value, fallback));
}

/// Address-in-use gets a remediation hint instead of the raw OS error
pub fn log_port_in_use(port: u16) {
    for line in port_in_use_message(port) {
        write_info(&line);
    }
}

fn invalid_port_message(value: &str, fallback: u16) -> String {
    format!("Invalid port '{value}', using port {fallback}")
}

/// Lines reported when `port` is taken, suggesting the next port up
fn port_in_use_message(port: u16) -> Vec<String> {
    let hint = match port.checked_add(1) {
        Some(next) => format!("Try another port: {} {next}", env!("CARGO_PKG_NAME")),
        None => "Try another port".to_string(),
    };
    vec![format!("Error: port {port} is already in use"), hint]
}

pub fn log_start_failed(err: &dyn std::fmt::Display) {
    write_info(&format!("Error starting server: {err}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    write_access(&entry.format_common());
}
