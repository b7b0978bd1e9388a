//! HTTP responder
//!
//! Accept loop and per-connection handling:
//! - socket2-tuned listener (SO_REUSEADDR, TCP_NODELAY)
//! - One tokio task per connection, HTTP/1.1 via hyper
//! - Every request, any method and any path, gets the same rendered page
//! - Graceful shutdown: stop accepting, drain in-flight connections

use crate::page;
use crate::{Error, Result, SystemInfo};
use bytes::Bytes;
use http::header::{CONNECTION, CONTENT_TYPE};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub hostname: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            hostname: "0.0.0.0".to_string(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `PORT` overrides the listen port; unset or empty keeps the default.
    /// A value that does not parse as a port is a startup error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(port) = std::env::var("PORT") {
            if !port.is_empty() {
                config.port = port
                    .parse()
                    .map_err(|_| Error::InvalidPort(port.clone()))?;
            }
        }
        Ok(config)
    }

    fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.hostname, self.port);
        addr.parse().map_err(|_| Error::InvalidAddress(addr))
    }
}

/// Tracks active connections for graceful shutdown
///
/// Used to:
/// - Count active connections
/// - Signal shutdown to reject new connections
/// - Wait for existing connections to drain
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    /// Active connection count
    active: AtomicU64,
    /// Shutdown signal received
    shutting_down: AtomicBool,
}

impl ConnectionTracker {
    /// Create a new connection tracker
    pub fn new() -> Self {
        Self {
            active: AtomicU64::new(0),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Increment active connection count
    #[inline]
    pub fn increment(&self) {
        self.active.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement active connection count
    #[inline]
    pub fn decrement(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    /// Get current active connection count
    #[inline]
    pub fn count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Signal that shutdown is in progress
    pub fn start_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    /// Check if shutdown is in progress
    #[inline]
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }
}

/// Create a TCP listener with socket options applied
fn create_listener(addr: &SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // TCP_NODELAY - the whole response goes out in one write
    socket.set_nodelay(true)?;

    // tokio requires the socket in non-blocking mode
    socket.set_nonblocking(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;

    TcpListener::from_std(socket.into())
}

/// HTTP responder bound to a local address
pub struct Server {
    listener: TcpListener,
    tracker: Arc<ConnectionTracker>,
}

impl Server {
    /// Bind the listening socket. Failure here is fatal to startup.
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        let addr = config.socket_addr()?;
        let listener = create_listener(&addr)?;
        Ok(Self {
            listener,
            tracker: Arc::new(ConnectionTracker::new()),
        })
    }

    /// Address the listener is bound to (resolves port 0 to the real port)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle to the connection tracker
    pub fn tracker(&self) -> Arc<ConnectionTracker> {
        self.tracker.clone()
    }

    /// Accept connections until `shutdown` resolves, then drain and return.
    ///
    /// Per-connection errors are logged and dropped; they never stop the
    /// accept loop or affect other connections.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let tracker = self.tracker.clone();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            continue;
                        }
                    };

                    // Reject new connections during shutdown
                    if tracker.is_shutting_down() {
                        drop(stream);
                        continue;
                    }

                    let conn_tracker = tracker.clone();
                    conn_tracker.increment();

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        if let Err(e) = http1::Builder::new()
                            .serve_connection(io, service_fn(handle_request))
                            .await
                        {
                            // Only log if not a normal connection close
                            if !e.to_string().contains("connection closed") {
                                warn!(peer = %peer, error = %e, "connection error");
                            }
                        }
                        conn_tracker.decrement();
                    });
                }
                _ = &mut shutdown => {
                    tracker.start_shutdown();
                    break;
                }
            }
        }

        // Stop accepting, then wait for in-flight responses to finish
        drop(self.listener);
        let active = tracker.count();
        if active > 0 {
            info!(active, "draining in-flight connections");
        }
        while tracker.count() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        debug!("shutdown complete");

        Ok(())
    }
}

/// Handle one request: collect host facts, render, respond.
///
/// Method and path are intentionally ignored; the request only triggers the
/// response cycle.
async fn handle_request(
    _req: hyper::Request<hyper::body::Incoming>,
) -> std::result::Result<hyper::Response<Full<Bytes>>, std::convert::Infallible> {
    let info = SystemInfo::collect();
    let body = page::render(&info);

    let response = hyper::Response::builder()
        .status(200)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONNECTION, "close")
        .body(Full::new(Bytes::from(body)))
        .unwrap();

    Ok(response)
}
