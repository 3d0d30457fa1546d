// Application state module
// Read-only state shared by every connection

use std::path::PathBuf;

use super::types::Config;
use crate::error::{Result, ServerError};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical served root
    pub root: PathBuf,
}

impl AppState {
    /// Create `AppState`, resolving the served root once
    pub fn new(config: Config) -> Result<Self> {
        let root = std::fs::canonicalize(&config.server.root).map_err(|source| {
            ServerError::Root {
                path: config.server.root.clone(),
                source,
            }
        })?;
        if !root.is_dir() {
            return Err(ServerError::Root {
                path: config.server.root.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }
        Ok(Self { config, root })
    }
}
