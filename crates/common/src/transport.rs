// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Minimal HTTP/1.0 request transport over the daemon's Unix socket
//!
//! One connection per call, no keep-alive. The daemon is a local, trusted
//! counterpart with a fixed simple response shape, so this is not a general
//! HTTP client: the response is read to EOF and split on the first blank
//! line. Call volume is seconds-level polling, so the per-call connection
//! setup cost is acceptable.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use crate::error::{Error, Result};

/// Blank-line separator between response headers and body.
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone)]
pub struct UnixHttp {
    socket_path: PathBuf,
    timeout: Duration,
}

impl UnixHttp {
    pub fn new(socket_path: PathBuf, timeout: Duration) -> Self {
        Self {
            socket_path,
            timeout,
        }
    }

    /// Send one request and return the raw response bytes.
    ///
    /// Connect failure, write failure, read failure, and timeout all
    /// collapse to `Error::Unreachable`; the cause is only logged.
    pub async fn send(&self, method: &str, query: &str, body: &str) -> Result<Vec<u8>> {
        let request = build_request(method, query, body);

        let mut stream = self
            .bounded(UnixStream::connect(&self.socket_path))
            .await
            .map_err(|e| self.unreachable(query, "connect", e))?;

        self.bounded(stream.write_all(request.as_bytes()))
            .await
            .map_err(|e| self.unreachable(query, "write", e))?;

        let mut response = Vec::new();
        self.bounded(stream.read_to_end(&mut response))
            .await
            .map_err(|e| self.unreachable(query, "read", e))?;

        Ok(response)
    }

    /// Send one request and return only the response body.
    pub async fn send_for_body(&self, method: &str, query: &str, body: &str) -> Result<Vec<u8>> {
        let raw = self.send(method, query, body).await?;
        http_body(&raw).ok_or_else(|| {
            tracing::debug!(query, "response had no header/body separator");
            Error::Unreachable
        })
    }

    async fn bounded<T, F>(&self, fut: F) -> std::io::Result<T>
    where
        F: std::future::Future<Output = std::io::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "daemon call timed out",
            )),
        }
    }

    fn unreachable(&self, query: &str, stage: &str, err: std::io::Error) -> Error {
        tracing::debug!(
            query,
            stage,
            error = %err,
            socket = %self.socket_path.display(),
            "daemon call failed"
        );
        Error::Unreachable
    }
}

/// Build the request text: request line, content headers only when a body
/// is present, blank line, body.
fn build_request(method: &str, query: &str, body: &str) -> String {
    let mut headers = String::new();
    if !body.is_empty() {
        headers.push_str(&format!("Content-Length: {}\r\n", body.len()));
        headers.push_str("Content-Type: application/json\r\n");
    }
    format!("{method} {query} HTTP/1.0\r\n{headers}\r\n{body}")
}

/// Return everything after the first blank-line separator, or `None` when
/// the response carries no separator.
fn http_body(raw: &[u8]) -> Option<Vec<u8>> {
    raw.windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
        .map(|pos| raw[pos + HEADER_TERMINATOR.len()..].to_vec())
}
