// Server loop module
// Accepts connections until shutdown is requested

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections until `shutdown` is notified
///
/// The listener is dropped on return, so no further connections are
/// accepted. Connections already spawned are not awaited.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Overrides};
    use crate::server::listener::bind_listener;
    use std::net::SocketAddr;
    use std::path::Path;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn state_for(dir: &Path) -> Arc<AppState> {
        let config = Config::load(&Overrides {
            root: Some(dir.to_string_lossy().into_owned()),
            access_log: Some(false),
            ..Overrides::default()
        })
        .unwrap();
        Arc::new(AppState::new(config).unwrap())
    }

    /// Send one raw request and return the lowercased response text
    async fn roundtrip(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        String::from_utf8_lossy(&raw).to_lowercase()
    }

    #[tokio::test]
    async fn test_serves_over_tcp_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hello</h1>").unwrap();

        let listener = bind_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(
            listener,
            state_for(dir.path()),
            Arc::clone(&shutdown),
        ));

        let get = roundtrip(
            addr,
            "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(get.starts_with("http/1.1 200 ok"), "{get}");
        assert!(get.contains("access-control-allow-origin: *"));
        assert!(get.contains("permissions-policy: unload=*, microphone=*, camera=*, autoplay=*"));
        assert!(get.contains("content-security-policy: default-src 'self'"));
        assert!(get.ends_with("<h1>hello</h1>"));

        let missing = roundtrip(
            addr,
            "GET /missing.js HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(missing.starts_with("http/1.1 404 not found"), "{missing}");
        assert!(missing.contains("content-security-policy:"));
        assert!(missing.contains("access-control-allow-methods: get, post, options"));

        let preflight = roundtrip(
            addr,
            "OPTIONS /api HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(preflight.starts_with("http/1.1 200 ok"), "{preflight}");
        assert!(preflight.contains("access-control-allow-headers: content-type, authorization"));
        assert!(!preflight.contains("content-security-policy"));
        assert!(!preflight.contains("permissions-policy"));

        shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("loop should stop after shutdown")
            .unwrap();

        assert!(TcpStream::connect(addr).await.is_err());
    }
}
