// Connection handling module
// Serves a single accepted TCP connection and writes the access log

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Body as _;
use hyper::header::CONTENT_LENGTH;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::handler;
use crate::http::ResponseBody;
use crate::logger::{self, AccessLogEntry};

/// Handle a single connection in a spawned task.
///
/// The connection is served as HTTP/1.1 with keep-alive. Errors (usually a
/// client going away mid-request) are logged and end only this connection.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address, used by the access log
/// * `state` - Shared application state
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { handle_with_access_log(req, state, peer_addr).await }
        });

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            logger::log_connection_error(&err);
        }
    });
}

/// Run the request handler, recording one access log line when enabled
async fn handle_with_access_log<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    if !state.config.logging.access_log {
        return handler::handle_request(req, state).await;
    }

    let mut entry = AccessLogEntry::new(
        peer_addr,
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = logger::version_label(req.version()).to_string();

    let response = handler::handle_request(req, state).await?;

    entry.status = response.status().as_u16();
    entry.body_bytes = body_length(&response);
    logger::log_access(&entry);

    Ok(response)
}

/// Bytes sent for `response`; streamed bodies fall back to `Content-Length`
fn body_length(response: &Response<ResponseBody>) -> u64 {
    response.body().size_hint().exact().unwrap_or_else(|| {
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    })
}
