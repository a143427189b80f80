//! End-to-end tests: client → relay → backend.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use dns_relay::discovery::ResolveError;
use dns_relay::load_balancer::Endpoint;
use dns_relay::lifecycle::StartupError;
use dns_relay::RelayServer;

mod common;

#[tokio::test]
async fn test_bytes_flow_both_ways() {
    let backend = common::start_echo_backend().await;
    let relay = common::start_relay(&backend.to_string()).await;

    let mut client = TcpStream::connect(relay.addr).await.unwrap();
    client.write_all(b"hello through the relay").await.unwrap();

    let mut buf = [0u8; 23];
    client.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"hello through the relay");

    // Second exchange on the same session.
    client.write_all(b"bye").await.unwrap();
    let mut rest = [0u8; 3];
    client.read_exact(&mut rest).await.unwrap();
    assert_eq!(&rest, b"bye");

    // Closing our side ends the session; the relay closes its end too.
    client.shutdown().await.unwrap();
    let mut tail = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), client.read_to_end(&mut tail))
        .await
        .unwrap()
        .unwrap();
    assert!(tail.is_empty());

    relay.shutdown.trigger();
    relay.task.await.unwrap();
}

#[tokio::test]
async fn test_round_robin_across_backends() {
    let a = common::start_tagged_backend("a").await;
    let b = common::start_tagged_backend("b").await;
    let c = common::start_tagged_backend("c").await;
    let relay = common::start_relay(&format!("{},{},{}", a, b, c)).await;
    let expected: Vec<Endpoint> = [a, b, c].iter().map(|addr| addr.to_string().into()).collect();
    assert_eq!(relay.pool.snapshot()[..], expected[..]);

    let mut seen = Vec::new();
    for _ in 0..6 {
        let reply = common::read_all_from(relay.addr).await;
        seen.push(String::from_utf8(reply).unwrap());
    }

    assert_eq!(seen, vec!["b", "c", "a", "b", "c", "a"]);
    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_dial_failure_closes_client_and_next_connection_moves_on() {
    let down = common::refused_addr().await;
    let up = common::start_tagged_backend("up").await;
    let relay = common::start_relay(&format!("{},{}", up, down)).await;

    // First pick (index 1) is the dead endpoint: closed with nothing relayed.
    assert!(common::read_all_from(relay.addr).await.is_empty());

    // The relay keeps serving; the next connection gets the next endpoint.
    assert_eq!(common::read_all_from(relay.addr).await, b"up");

    relay.shutdown.trigger();
    relay.task.await.unwrap();
}

#[tokio::test]
async fn test_concurrent_sessions_are_independent() {
    let backend = common::start_echo_backend().await;
    let relay = common::start_relay(&backend.to_string()).await;

    let clients: Vec<_> = (0..16u8)
        .map(|i| {
            let addr = relay.addr;
            tokio::spawn(async move {
                let mut client = TcpStream::connect(addr).await.unwrap();
                let payload = vec![i; 4096];
                client.write_all(&payload).await.unwrap();
                let mut echoed = vec![0u8; payload.len()];
                client.read_exact(&mut echoed).await.unwrap();
                assert_eq!(echoed, payload);
            })
        })
        .collect();

    for client in clients {
        tokio::time::timeout(Duration::from_secs(5), client)
            .await
            .unwrap()
            .unwrap();
    }

    relay.shutdown.trigger();
    relay.task.await.unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let backend = common::start_echo_backend().await;
    let relay = common::start_relay(&backend.to_string()).await;

    relay.shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), relay.task)
        .await
        .unwrap()
        .unwrap();

    assert!(TcpStream::connect(relay.addr).await.is_err());
}

#[tokio::test]
async fn test_startup_failures_are_reported() {
    let empty = common::relay_config(" , ");
    match RelayServer::bind(&empty).await {
        Err(StartupError::InitialResolution(ResolveError::InvalidSpec(_))) => {}
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("empty target list must not start"),
    }

    let backend = common::start_echo_backend().await;
    let mut taken = common::relay_config(&backend.to_string());
    taken.listener.port = backend.port();
    assert!(matches!(
        RelayServer::bind(&taken).await,
        Err(StartupError::Listener(_))
    ));
}
