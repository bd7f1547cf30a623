//! Startup ordering: nothing is bound until the database gate has passed.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use sia_rust::db::{ReadinessError, ReadinessPolicy, RepositoryConfig};
use sia_rust::startup::{run, RepositorySource};

fn fast_policy(max_attempts: u32) -> ReadinessPolicy {
    ReadinessPolicy {
        max_attempts,
        initial_backoff_ms: 20,
        max_backoff_ms: 40,
        connect_timeout_ms: 200,
    }
}

/// A loopback address with nothing listening on it.
async fn free_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn postgres_source_at(db_addr: SocketAddr) -> RepositorySource {
    let toml = format!(
        "[repository]\ntype = \"postgres\"\n\n[postgres]\n\
         database_url = \"postgresql://postgres:password@{db_addr}/sia\"\n"
    );
    RepositorySource::File(toml.parse::<RepositoryConfig>().unwrap())
}

fn local_source() -> RepositorySource {
    RepositorySource::File("[repository]\ntype = \"local\"\n".parse().unwrap())
}

#[tokio::test]
async fn test_exhausted_gate_fails_without_binding() {
    let source = postgres_source_at(free_addr().await);
    let addr = free_addr().await;

    let server = tokio::spawn(async move {
        run(&source, addr, &fast_policy(5), CancellationToken::new()).await
    });

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(TcpStream::connect(addr).await.is_err());

    let err = server.await.unwrap().unwrap_err();
    match err.downcast_ref::<ReadinessError>() {
        Some(ReadinessError::Exhausted { attempts, .. }) => assert_eq!(*attempts, 5),
        other => panic!("unexpected error: {other:?}"),
    }

    // The port was never taken.
    TcpListener::bind(addr).await.unwrap();
}

#[tokio::test]
async fn test_cancelled_gate_is_an_error() {
    let source = postgres_source_at(free_addr().await);
    let addr = free_addr().await;
    let policy = ReadinessPolicy {
        max_attempts: 1_000,
        initial_backoff_ms: 1_000,
        max_backoff_ms: 1_000,
        connect_timeout_ms: 200,
    };
    let token = CancellationToken::new();
    token.cancel();

    let started = Instant::now();
    let err = run(&source, addr, &policy, token).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReadinessError>(),
        Some(ReadinessError::Cancelled { .. })
    ));
    assert!(started.elapsed() < Duration::from_secs(1));
    TcpListener::bind(addr).await.unwrap();
}

#[tokio::test]
async fn test_local_source_serves_until_shutdown() {
    let addr = free_addr().await;
    let token = CancellationToken::new();

    let server_token = token.clone();
    let server = tokio::spawn(async move {
        run(&local_source(), addr, &fast_policy(1), server_token).await
    });

    let mut connected = false;
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            connected = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(connected, "server never accepted connections on {addr}");

    token.cancel();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
