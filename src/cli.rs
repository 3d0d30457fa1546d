//! Command-line interface
//!
//! A single optional positional port plus a few flags. The port is taken as
//! raw text so an invalid value can fall back to the default instead of
//! aborting.

use clap::Parser;

use crate::config::{Overrides, DEFAULT_PORT};
use crate::logger;

#[derive(Parser, Debug)]
#[command(
    name = "devserve",
    version,
    about = "Serve the current directory with CORS/CSP headers for embedding web playback SDKs"
)]
pub struct Cli {
    /// Port to listen on [default: 8000]
    #[arg(allow_negative_numbers = true)]
    pub port: Option<String>,

    /// Directory to serve [default: current directory]
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<String>,

    /// Address to bind [default: 0.0.0.0, all interfaces]
    #[arg(short = 'b', long = "bind", value_name = "ADDR")]
    pub bind: Option<String>,

    /// Do not print a line per request
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// Port to bind; an invalid value is reported and replaced by the default
    pub fn resolve_port(&self) -> u16 {
        match self.port.as_deref() {
            None => DEFAULT_PORT,
            Some(raw) => parse_port(raw).unwrap_or_else(|| {
                logger::log_invalid_port(raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
        }
    }

    /// Configuration overrides carried by the arguments
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.bind.clone(),
            port: Some(self.resolve_port()),
            root: self.directory.clone(),
            access_log: self.quiet.then_some(false),
        }
    }
}

/// Parse a port number, accepting surrounding whitespace
pub fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse().ok()
}
