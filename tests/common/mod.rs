//! Shared helpers for the integration tests: spawn a server on a dynamic
//! port and talk to it over a raw TCP client, so the tests exercise the real
//! HTTP/1.1 surface the browser under test would see.

#![allow(dead_code)]

use fixtured::{Config, FixtureServer, ServerHandle};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Bind a fixture server with default configuration and run it in the
/// background, returning its control handle.
pub fn spawn_server() -> ServerHandle {
    spawn_server_with(Config::default())
}

/// Bind with custom configuration; tests run from the crate root, so the
/// default relative `assets` dir resolves to the checked-in fixtures.
pub fn spawn_server_with(config: Config) -> ServerHandle {
    let server = FixtureServer::bind(config).expect("bind fixture server");
    let handle = server.handle();
    tokio::spawn(server.run());
    handle
}

/// Minimal parsed HTTP response.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub async fn get(addr: SocketAddr, path: &str) -> HttpResponse {
    request(addr, "GET", path, &[]).await
}

pub async fn head(addr: SocketAddr, path: &str) -> HttpResponse {
    request(addr, "HEAD", path, &[]).await
}

pub async fn get_with_headers(
    addr: SocketAddr,
    path: &str,
    extra: &[(&str, &str)],
) -> HttpResponse {
    request(addr, "GET", path, extra).await
}

/// Issue one request and read the connection to EOF (`Connection: close`).
pub async fn request(
    addr: SocketAddr,
    method: &str,
    path: &str,
    extra: &[(&str, &str)],
) -> HttpResponse {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    for (name, value) in extra {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    req.push_str("\r\n");
    stream.write_all(req.as_bytes()).await.expect("write request");

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read response");
    parse_response(&raw)
}

fn parse_response(raw: &[u8]) -> HttpResponse {
    let text = String::from_utf8_lossy(raw).into_owned();
    let (head, body) = text
        .split_once("\r\n\r\n")
        .unwrap_or((text.as_str(), ""));

    let mut lines = head.lines();
    let status_line = lines.next().expect("status line");
    let status = status_line
        .split_whitespace()
        .nth(1)
        .expect("status code")
        .parse()
        .expect("numeric status");
    let headers = lines
        .filter_map(|line| line.split_once(": "))
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();

    HttpResponse {
        status,
        headers,
        body: body.to_string(),
    }
}
