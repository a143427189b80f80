//! Per-connection relay sessions.
//!
//! # Responsibilities
//! - Pick the next endpoint from the pool
//! - Dial it, abandoning the inbound connection on failure
//! - Copy bytes both ways until both directions are done
//!
//! # Design Decisions
//! - One dial attempt per session; the next connection gets the next endpoint
//! - The session ends as soon as either side is done; an idle peer cannot
//!   keep a finished session (and its connection slot) alive
//! - Both sockets are owned by the session and dropped exactly once on return

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::load_balancer::{Endpoint, LoadBalancer};

const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// How a relay session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The pool was empty; the inbound connection was closed untouched.
    NoEndpoint,
    /// The chosen endpoint could not be dialed.
    DialFailed { endpoint: Endpoint },
    /// Both directions ran to completion.
    Completed {
        endpoint: Endpoint,
        to_backend: u64,
        from_backend: u64,
    },
}

/// Relays inbound connections to endpoints chosen by a load balancer.
#[derive(Debug, Clone)]
pub struct Relay {
    pool: Arc<dyn LoadBalancer>,
}

impl Relay {
    pub fn new(pool: Arc<dyn LoadBalancer>) -> Self {
        Self { pool }
    }

    /// Run one session to completion. Errors are logged here and never escape.
    pub async fn handle(&self, inbound: TcpStream, peer_addr: SocketAddr) -> SessionOutcome {
        let Some(endpoint) = self.pool.next() else {
            tracing::warn!(addr = %peer_addr, "No endpoints available, closing connection");
            return SessionOutcome::NoEndpoint;
        };

        let outbound = match TcpStream::connect(endpoint.as_str()).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(
                    addr = %peer_addr,
                    endpoint = %endpoint,
                    error = %e,
                    "Error dialing remote addr"
                );
                return SessionOutcome::DialFailed { endpoint };
            }
        };

        tracing::debug!(addr = %peer_addr, endpoint = %endpoint, "Connected to backend");

        let (to_backend, from_backend) = relay_streams(inbound, outbound).await;

        tracing::debug!(
            addr = %peer_addr,
            endpoint = %endpoint,
            to_backend,
            from_backend,
            "Relay session finished"
        );

        SessionOutcome::Completed {
            endpoint,
            to_backend,
            from_backend,
        }
    }
}

/// Copy `inbound <-> outbound` until either side is done.
///
/// The first direction to finish ends the session: its destination is
/// half-closed, then both connections are dropped, which stops the other copy.
///
/// Returns (bytes_to_outbound, bytes_to_inbound).
pub async fn relay_streams(inbound: TcpStream, outbound: TcpStream) -> (u64, u64) {
    let (mut inbound_read, mut inbound_write) = inbound.into_split();
    let (mut outbound_read, mut outbound_write) = outbound.into_split();
    let mut to_outbound = 0;
    let mut to_inbound = 0;

    tokio::select! {
        () = pipe("upstream", &mut inbound_read, &mut outbound_write, &mut to_outbound) => {
            tracing::trace!("Client side finished first");
        }
        () = pipe("downstream", &mut outbound_read, &mut inbound_write, &mut to_inbound) => {
            tracing::trace!("Backend side finished first");
        }
    }

    (to_outbound, to_inbound)
}

/// Forward `reader` into `writer` until end of stream or an error.
async fn pipe<R, W>(direction: &'static str, reader: &mut R, writer: &mut W, copied: &mut u64)
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(direction, error = %e, "Read ended with error");
                break;
            }
        };

        if let Err(e) = writer.write_all(&buf[..n]).await {
            tracing::debug!(direction, error = %e, "Write ended with error");
            break;
        }
        *copied += n as u64;
    }

    if let Err(e) = writer.shutdown().await {
        tracing::trace!(direction, error = %e, "Half-close failed");
    }
}
