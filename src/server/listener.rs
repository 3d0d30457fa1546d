// Listener module
// Creates the TCP listener, classifying bind failures

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::{Result, ServerError};

/// Pending-connection queue length
const BACKLOG: i32 = 128;

/// Bind a `TcpListener` on `addr`
///
/// `SO_REUSEADDR` is enabled on Unix so a restart is not blocked by sockets in
/// `TIME_WAIT`. `SO_REUSEPORT` is never set: a second server on the same port
/// must fail with address-in-use.
///
/// # Returns
///
/// * `Ok(TcpListener)` - Successfully created and bound listener
/// * `Err(ServerError::AddrInUse)` - The port is taken
/// * `Err(ServerError::Bind)` - Any other socket error
pub fn bind_listener(addr: SocketAddr) -> Result<TcpListener> {
    create_listener(addr).map_err(|e| ServerError::from_bind(addr, e))
}

fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    // Create socket with appropriate domain (IPv4 or IPv6)
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
