//! hostpage-core: host introspection HTTP server core
//!
//! Collects host facts (hostname, addresses, CPU, memory, uptime) and serves
//! them as a single HTML page over HTTP/1.1:
//! - Task-per-connection serving on tokio/hyper
//! - Graceful shutdown with connection draining
//! - Fact collection never fails a request; missing facts degrade to
//!   empty or zero values

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod collect;
pub mod error;
pub mod page;
pub mod server;

// Re-exports
pub use collect::SystemInfo;
pub use error::{Error, Result};
pub use server::{ConnectionTracker, Server, ServerConfig};
