//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use health_lb::config::BalancerConfig;
use health_lb::http::{upstream_client, HttpServer};
use health_lb::lifecycle::startup;
use health_lb::Shutdown;

/// An address nothing listens on.
#[allow(dead_code)]
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Read the request head (request line + headers).
async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        _ => "200 OK",
    }
}

/// Start a backend whose answer is computed from the request head.
/// `delay` is applied before the response is written.
pub async fn start_programmable_backend<F>(f: F) -> SocketAddr
where
    F: Fn(&str) -> (Duration, u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let head = read_head(&mut socket).await;
                let (delay, status, body) = f(&head);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nX-Backend: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line(status),
                    addr.port(),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that answers `name` after `delay`.
#[allow(dead_code)]
pub async fn start_mock_backend(name: &'static str, delay: Duration) -> SocketAddr {
    start_programmable_backend(move |_| (delay, 200, name.to_string())).await
}

/// Start the balancer on an ephemeral port.
#[allow(dead_code)]
pub async fn start_balancer(mut config: BalancerConfig) -> (SocketAddr, Shutdown) {
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;

    let (pool, listener) = startup::prepare(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, pool, upstream_client());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Balancer config for the given backends.
#[allow(dead_code)]
pub fn config_for(backends: &[SocketAddr]) -> BalancerConfig {
    let mut config = BalancerConfig::default();
    config.backends = backends.iter().map(|a| format!("http://{}", a)).collect();
    config.health_check.interval_secs = 1;
    config
}

#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
