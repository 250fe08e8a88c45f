//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use spa_gateway::config::GatewayConfig;
use spa_gateway::lifecycle::{self, Shutdown};
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub const SHELL: &str = "<!doctype html><html><body>shell</body></html>";
pub const APP_JS: &str = "console.log('app')";

/// An asset root with an entry document, a script and a nested page.
pub fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("index.html"), SHELL).unwrap();
    std::fs::write(dir.path().join("assets/app.js"), APP_JS).unwrap();
    std::fs::write(dir.path().join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();
    dir
}

/// An address nothing is listening on.
pub fn closed_addr() -> SocketAddr {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
}

/// Start a mock backend that answers every request with
/// `<request line>\n<host header>` as the body, followed by `\n<payload>`
/// when the request carried one. An `x-client-tag` request header comes back
/// as `x-echo-client-tag`.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut reader = BufReader::new(socket);
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.is_err() {
                    return;
                }
                let mut host = String::new();
                let mut client_tag = None;
                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line).await {
                        Ok(0) | Err(_) => return,
                        Ok(_) if line == "\r\n" => break,
                        Ok(_) => {
                            if let Some((name, value)) = line.split_once(':') {
                                if name.eq_ignore_ascii_case("host") {
                                    host = value.trim().to_string();
                                } else if name.eq_ignore_ascii_case("x-client-tag") {
                                    client_tag = Some(value.trim().to_string());
                                } else if name.eq_ignore_ascii_case("content-length") {
                                    content_length = value.trim().parse().unwrap_or(0);
                                }
                            }
                        }
                    }
                }

                let mut payload = vec![0u8; content_length];
                if reader.read_exact(&mut payload).await.is_err() {
                    return;
                }

                let mut body = format!("{}\n{}", request_line.trim_end(), host);
                if !payload.is_empty() {
                    body.push('\n');
                    body.push_str(&String::from_utf8_lossy(&payload));
                }
                let tag = client_tag
                    .map(|tag| format!("X-Echo-Client-Tag: {tag}\r\n"))
                    .unwrap_or_default();
                let response = format!(
                    "HTTP/1.1 201 Created\r\nContent-Type: text/plain\r\nX-Backend: echo\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    tag,
                    body.len(),
                    body
                );
                let mut socket = reader.into_inner();
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that accepts connections and never answers.
pub async fn start_hung_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// Start a backend that reads the start of each request, then drops the
/// connection without answering.
pub async fn start_resetting_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            drop(socket);
        }
    });

    addr
}

/// Gateway config pointing at `upstream`, serving `assets`, on an ephemeral port.
pub fn config(upstream: SocketAddr, assets: &TempDir) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.origin = format!("http://{upstream}");
    config.upstream.connect_timeout_secs = 1;
    config.upstream.response_timeout_secs = 2;
    config.assets.root = assets.path().to_path_buf();
    config.shutdown.grace_secs = 1;
    config
}

/// Start the gateway in the background; returns its address and shutdown handle.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let (server, listener) = lifecycle::start(config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, stop).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Send a request with the target written exactly as given (no client-side
/// dot-segment normalization). Returns the status code and body.
pub async fn raw_get(addr: SocketAddr, target: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8_lossy(&raw).into_owned();

    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    (status, body.to_string())
}
