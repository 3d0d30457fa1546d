// Configuration module entry point
// Layers built-in defaults under command-line overrides

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Port used when none is given or the given one is invalid
pub const DEFAULT_PORT: u16 = 8000;

/// Values supplied on the command line; `None` keeps the default
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root: Option<String>,
    pub access_log: Option<bool>,
}

impl Config {
    /// Build configuration from defaults and command-line overrides
    ///
    /// No file or environment source is consulted.
    pub fn load(overrides: &Overrides) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root", ".")?
            .set_default("logging.access_log", true)?
            .set_default(
                "http.server_name",
                concat!("devserve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option("server.root", overrides.root.clone())?
            .set_override_option("logging.access_log", overrides.access_log)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.server.host.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// URL printed at startup; unspecified hosts are shown as loopback
    pub fn display_url(&self, port: u16) -> String {
        match self.server.host.as_str() {
            "0.0.0.0" => format!("http://127.0.0.1:{port}"),
            "::" => format!("http://[::1]:{port}"),
            h if h.contains(':') => format!("http://[{h}]:{port}"),
            h => format!("http://{h}:{port}"),
        }
    }
}
