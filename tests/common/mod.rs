//! Shared utilities for relay integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use dns_relay::config::RelayConfig;
use dns_relay::load_balancer::RoundRobin;
use dns_relay::{RelayServer, Shutdown};

/// Start a backend that echoes everything back until the client closes.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let (mut reader, mut writer) = socket.split();
                        let _ = tokio::io::copy(&mut reader, &mut writer).await;
                        let _ = writer.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that writes `tag` and closes every connection.
#[allow(dead_code)]
pub async fn start_tagged_backend(tag: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = socket.write_all(tag.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A config for a relay on an ephemeral loopback port.
pub fn relay_config(spec: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.target.spec = spec.to_string();
    config
}

/// A running relay and the handle to stop it.
#[allow(dead_code)]
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub pool: Arc<RoundRobin>,
    pub shutdown: Shutdown,
    pub task: JoinHandle<()>,
}

/// Bind and run a relay for `spec`.
pub async fn start_relay(spec: &str) -> RunningRelay {
    let server = RelayServer::bind(&relay_config(spec)).await.unwrap();
    let addr = server.local_addr().unwrap();
    let pool = server.pool();
    let shutdown = Shutdown::new();
    let serving = server.run(&shutdown);

    let task = tokio::spawn(async move {
        serving.await.unwrap();
    });

    RunningRelay {
        addr,
        pool,
        shutdown,
        task,
    }
}

/// Connect, read everything the relay sends back, with a deadline.
#[allow(dead_code)]
pub async fn read_all_from(addr: SocketAddr) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut buf = Vec::new();
    let _ = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .expect("relay did not close the connection");
    buf
}
