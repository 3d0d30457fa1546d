// Server module entry point
// Binds the listener, installs signal handling and runs the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;

use crate::config::AppState;
use crate::error::Result;
use crate::logger;

pub use listener::bind_listener;
pub use server_loop::start_server_loop;
use signal::SignalHandler;

/// Bind the configured address and serve until interrupted
///
/// Bind failures are returned before anything is served.
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.get_socket_addr()?;
    let listener = bind_listener(addr)?;
    let bound = listener.local_addr()?;

    let signals = Arc::new(SignalHandler::new());
    signal::start_signal_handler(Arc::clone(&signals))?;

    logger::log_server_start(&state.config.display_url(bound.port()), &bound, &state.root);
    start_server_loop(listener, state, signals.shutdown()).await;
    logger::log_server_stopped();

    Ok(())
}
