//! TCP connection establishment.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::error::{Operation, ProtocolError, Result};

/// Options for [`connect_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Try IPv4 candidates before the others.
    pub prefer_ipv4: bool,
    /// Deadline for each candidate.
    pub timeout: Option<Duration>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            prefer_ipv4: true,
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Open a TCP connection to `host:port` with default options.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream> {
    connect_with(host, port, ConnectOptions::default()).await
}

/// Resolve `host:port` and connect to the first candidate that accepts.
///
/// Candidates are tried in resolver order, IPv4 first when
/// `prefer_ipv4` is set. There is no retry.
pub async fn connect_with(host: &str, port: u16, options: ConnectOptions) -> Result<TcpStream> {
    let addrs = resolve(host, port, options.prefer_ipv4).await?;
    let addr_count = addrs.len();

    let mut last_err = None;
    let mut all_timed_out = true;
    for addr in addrs {
        debug!(%addr, "connecting");
        match connect_one(addr, options.timeout).await {
            Ok(stream) => {
                configure(&stream);
                debug!(%addr, "connected");
                return Ok(stream);
            }
            Err(e) => {
                debug!(%addr, error = %e, "candidate failed");
                all_timed_out &= e.kind() == std::io::ErrorKind::TimedOut;
                last_err = Some(e);
            }
        }
    }

    if let (true, Some(after)) = (all_timed_out, options.timeout) {
        return Err(ProtocolError::Timeout {
            op: Operation::Connect,
            after,
        });
    }

    let source = last_err.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no candidate address")
    });
    Err(ProtocolError::Connection { addr_count, source })
}

async fn resolve(host: &str, port: u16, prefer_ipv4: bool) -> Result<Vec<SocketAddr>> {
    let resolved = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        ProtocolError::Resolution {
            host: host.to_string(),
            port,
            source: Some(e),
        }
    })?;

    let addrs = order_candidates(resolved.collect(), prefer_ipv4);
    if addrs.is_empty() {
        return Err(ProtocolError::Resolution {
            host: host.to_string(),
            port,
            source: None,
        });
    }
    Ok(addrs)
}

/// Stable partition: IPv4 first, resolver order kept within each family.
fn order_candidates(mut addrs: Vec<SocketAddr>, prefer_ipv4: bool) -> Vec<SocketAddr> {
    if prefer_ipv4 {
        addrs.sort_by_key(|addr| !addr.is_ipv4());
    }
    addrs
}

async fn connect_one(addr: SocketAddr, timeout: Option<Duration>) -> std::io::Result<TcpStream> {
    match timeout {
        Some(after) => match tokio::time::timeout(after, TcpStream::connect(addr)).await {
            Ok(result) => result,
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("connect timed out after {:?}", after),
            )),
        },
        None => TcpStream::connect(addr).await,
    }
}

fn configure(stream: &TcpStream) {
    if let Err(e) = stream.set_nodelay(true) {
        warn!("failed to set TCP_NODELAY: {}", e);
    }
    if let Err(e) = enable_keepalive(stream) {
        warn!("failed to enable TCP keepalive: {}", e);
    }
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}
