// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

// Hub Connect - Daemon Client Module
// Typed operations against the provider daemon, shared by CLI and GUI

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::UnixHttp;
use crate::types::{
    parse_access_level, AccessLevel, NodeId, NodeInfo, NodeRegistration, SavedNodeInfo,
    StatusResponse,
};

/// Daemon-wide connection mode: automatic connection decisions versus
/// manual per-node control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    Manual,
    Auto,
}

impl ConnectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectMode::Manual => "manual",
            ConnectMode::Auto => "auto",
        }
    }
}

/// The daemon operations the core engine depends on.
///
/// Kept as a trait so the reconciler, poller, and command layer can be
/// exercised against a scripted implementation in tests.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Daemon status, carrying the readiness flag.
    async fn status(&self) -> Result<StatusResponse>;

    /// Nodes currently visible on the LAN.
    async fn lan_nodes(&self) -> Result<Vec<NodeInfo>>;

    /// Nodes the daemon has persisted.
    async fn saved_nodes(&self) -> Result<Vec<SavedNodeInfo>>;

    /// Current connection status per address.
    async fn connection_statuses(&self) -> Result<HashMap<String, String>>;

    /// Current access level for one node.
    async fn access_level(&self, id: &NodeId) -> Result<AccessLevel>;

    /// Register (level > 0) or deregister (level = 0) one node.
    async fn register_node(&self, id: &NodeId, registration: &NodeRegistration) -> Result<()>;

    /// Ask the daemon to connect to the given addresses.
    async fn connect(&self, addresses: &[String], save: bool) -> Result<()>;

    /// Ask the daemon to disconnect from the given addresses.
    async fn disconnect(&self, addresses: &[String], save: bool) -> Result<()>;

    /// Access level applied to automatically discovered nodes.
    async fn auto_access_level(&self) -> Result<AccessLevel>;

    /// Set (level > 0) or clear (level = 0) the automatic access level.
    async fn set_auto_access_level(&self, level: AccessLevel) -> Result<()>;

    /// Switch the daemon between automatic and manual connection mode.
    async fn set_connect_mode(&self, mode: ConnectMode, save: bool) -> Result<()>;
}

/// Daemon client speaking the simplified HTTP protocol over the local
/// Unix socket.
#[derive(Debug, Clone)]
pub struct DaemonClient {
    transport: UnixHttp,
}

impl DaemonClient {
    /// Create a client from configuration, resolving the socket path.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let socket_path = config.resolve_socket_path()?;
        tracing::debug!(socket = %socket_path.display(), "using daemon socket");
        Ok(Self {
            transport: UnixHttp::new(socket_path, config.io_timeout()),
        })
    }

    pub fn with_transport(transport: UnixHttp) -> Self {
        Self { transport }
    }

    async fn get_json<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        let body = self.transport.send_for_body("GET", query, "").await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(query, error = %e, "malformed daemon response");
            Error::Unreachable
        })
    }
}

#[async_trait]
impl ProviderApi for DaemonClient {
    async fn status(&self) -> Result<StatusResponse> {
        self.get_json("/status?timeout=5").await
    }

    async fn lan_nodes(&self) -> Result<Vec<NodeInfo>> {
        self.get_json("/lan/list").await
    }

    async fn saved_nodes(&self) -> Result<Vec<SavedNodeInfo>> {
        self.get_json("/nodes?saved").await
    }

    async fn connection_statuses(&self) -> Result<HashMap<String, String>> {
        let pairs: Vec<Vec<String>> = self.get_json("/connections/list/all").await?;
        let mut statuses = HashMap::new();
        for mut pair in pairs {
            if pair.len() < 2 {
                tracing::debug!(?pair, "short connection status entry ignored");
                continue;
            }
            let status = pair.remove(1);
            let address = pair.remove(0);
            statuses.insert(address, status);
        }
        Ok(statuses)
    }

    async fn access_level(&self, id: &NodeId) -> Result<AccessLevel> {
        let body = self
            .transport
            .send_for_body("GET", &format!("/nodes/{id}"), "")
            .await?;
        Ok(parse_access_level(&body))
    }

    async fn register_node(&self, id: &NodeId, registration: &NodeRegistration) -> Result<()> {
        let method = if registration.access_level > 0 {
            "PUT"
        } else {
            "DELETE"
        };
        let body = serde_json::to_string(registration)?;
        self.transport
            .send_for_body(method, &format!("/nodes/{id}"), &body)
            .await?;
        Ok(())
    }

    async fn connect(&self, addresses: &[String], save: bool) -> Result<()> {
        let query = if save {
            "/connections/connect?save=1"
        } else {
            "/connections/connect"
        };
        let body = serde_json::to_string(addresses)?;
        self.transport.send_for_body("POST", query, &body).await?;
        Ok(())
    }

    async fn disconnect(&self, addresses: &[String], save: bool) -> Result<()> {
        let query = if save {
            "/connections/disconnect?save=1"
        } else {
            "/connections/disconnect"
        };
        let body = serde_json::to_string(addresses)?;
        self.transport.send_for_body("POST", query, &body).await?;
        Ok(())
    }

    async fn auto_access_level(&self) -> Result<AccessLevel> {
        let body = self.transport.send_for_body("GET", "/nodes/auto", "").await?;
        Ok(parse_access_level(&body))
    }

    async fn set_auto_access_level(&self, level: AccessLevel) -> Result<()> {
        let method = if level > 0 { "PUT" } else { "DELETE" };
        let body = format!("{{\"accessLevel\":{level}}}");
        self.transport
            .send_for_body(method, "/nodes/auto", &body)
            .await?;
        Ok(())
    }

    async fn set_connect_mode(&self, mode: ConnectMode, save: bool) -> Result<()> {
        let query = if save {
            format!("/connections/mode/{}?save=1", mode.as_str())
        } else {
            format!("/connections/mode/{}", mode.as_str())
        };
        self.transport.send_for_body("PUT", &query, "").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixListener;

    /// Serve one canned response and capture the request text.
    async fn one_shot_server(
        response: &'static str,
    ) -> (tempfile::TempDir, PathBuf, tokio::sync::oneshot::Receiver<String>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = stream.read(&mut buf).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
            stream.write_all(response.as_bytes()).await.unwrap();
        });
        (dir, path, rx)
    }

    fn client_for(path: PathBuf) -> DaemonClient {
        DaemonClient::with_transport(UnixHttp::new(path, Duration::from_millis(2500)))
    }

    #[tokio::test]
    async fn test_lan_nodes_decoding() {
        let (_dir, path, _rx) = one_shot_server(
            "HTTP/1.0 200 OK\r\n\r\n\
             [{\"Host name\":\"A\",\"Addresses\":\"10.0.0.1:61000\",\"Description\":\"node_id=abc\"}]",
        )
        .await;
        let nodes = client_for(path).lan_nodes().await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].node_id(), Some(NodeId::from("abc")));
    }

    #[tokio::test]
    async fn test_connection_statuses_folding() {
        let (_dir, path, _rx) = one_shot_server(
            "HTTP/1.0 200 OK\r\n\r\n\
             [[\"10.0.0.1:61000\",\"connected\"],[\"10.0.0.2:61000\",\"pending\"],[\"bad\"]]",
        )
        .await;
        let statuses = client_for(path).connection_statuses().await.unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses["10.0.0.1:61000"], "connected");
        assert_eq!(statuses["10.0.0.2:61000"], "pending");
    }

    #[tokio::test]
    async fn test_register_node_uses_put_above_zero() {
        let (_dir, path, rx) = one_shot_server("HTTP/1.0 200 OK\r\n\r\nnull").await;
        let registration = NodeRegistration {
            address: "10.0.0.1:61000".to_string(),
            host_name: "A".to_string(),
            access_level: 1,
        };
        client_for(path)
            .register_node(&NodeId::from("abc"), &registration)
            .await
            .unwrap();
        let request = rx.await.unwrap();
        assert!(request.starts_with("PUT /nodes/abc HTTP/1.0\r\n"));
        assert!(request.contains("Content-Type: application/json"));
        assert!(request.ends_with(r#"{"address":"10.0.0.1:61000","hostName":"A","accessLevel":1}"#));
    }

    #[tokio::test]
    async fn test_register_node_uses_delete_at_zero() {
        let (_dir, path, rx) = one_shot_server("HTTP/1.0 200 OK\r\n\r\nnull").await;
        let registration = NodeRegistration {
            address: "10.0.0.1:61000".to_string(),
            host_name: "A".to_string(),
            access_level: 0,
        };
        client_for(path)
            .register_node(&NodeId::from("abc"), &registration)
            .await
            .unwrap();
        let request = rx.await.unwrap();
        assert!(request.starts_with("DELETE /nodes/abc HTTP/1.0\r\n"));
    }

    #[tokio::test]
    async fn test_connect_sends_address_array() {
        let (_dir, path, rx) = one_shot_server("HTTP/1.0 200 OK\r\n\r\nnull").await;
        client_for(path)
            .connect(&["10.0.0.1:61000".to_string()], true)
            .await
            .unwrap();
        let request = rx.await.unwrap();
        assert!(request.starts_with("POST /connections/connect?save=1 HTTP/1.0\r\n"));
        assert!(request.ends_with(r#"["10.0.0.1:61000"]"#));
    }

    #[tokio::test]
    async fn test_malformed_json_is_unreachable() {
        let (_dir, path, _rx) = one_shot_server("HTTP/1.0 200 OK\r\n\r\nnot json").await;
        let err = client_for(path).lan_nodes().await.unwrap_err();
        assert!(matches!(err, Error::Unreachable));
    }
}
