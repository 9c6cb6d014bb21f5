// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Data model shared between the daemon client and the core engine

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Access level for a node: 0 = disconnected, >0 = connected at that tier.
pub type AccessLevel = u32;

/// The access level meaning "not connected / manual off".
pub const DISCONNECTED_LEVEL: AccessLevel = 0;

/// Identifier of a peer node, as reported by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

/// A LAN-discovered node as reported by the daemon.
///
/// The node id is buried in the free-form description field as a
/// `key=value` line; nodes without one cannot be addressed by id and are
/// excluded from mode and connection operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(rename = "Host name")]
    pub name: String,
    #[serde(rename = "Addresses")]
    pub address: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl NodeInfo {
    /// Extract the node id from the first `key=value` line of the
    /// description. Returns `None` when the first line carries no `=` or an
    /// empty value.
    pub fn node_id(&self) -> Option<NodeId> {
        let first_line = self.description.lines().next()?;
        let (_, value) = first_line.split_once('=')?;
        if value.is_empty() {
            return None;
        }
        Some(NodeId(value.to_string()))
    }
}

/// A node the daemon has persisted independently of live discovery.
/// Always carries a node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedNodeInfo {
    #[serde(rename = "host_name")]
    pub name: String,
    pub address: String,
    #[serde(rename = "node_id")]
    pub node_id: NodeId,
}

impl SavedNodeInfo {
    /// Synthesize a displayable node record from a saved entry.
    pub fn to_node_info(&self) -> NodeInfo {
        NodeInfo {
            name: self.name.clone(),
            address: self.address.clone(),
            description: format!("node_id={}", self.node_id),
        }
    }
}

/// PUT/DELETE body for per-node registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRegistration {
    pub address: String,
    pub host_name: String,
    pub access_level: AccessLevel,
}

/// Response from the daemon status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    pub envs: HashMap<String, String>,
}

/// Sentinel value the daemon reports when it can serve connection
/// operations.
const READY_SENTINEL: &str = "Ready";

/// Environment key carrying the readiness state.
const READINESS_KEY: &str = "hostDirect";

impl StatusResponse {
    pub fn is_ready(&self) -> bool {
        self.envs.get(READINESS_KEY).map(String::as_str) == Some(READY_SENTINEL)
    }

    /// Human-readable state for display, e.g. "Ready" or "Error".
    pub fn state_text(&self) -> &str {
        self.envs
            .get(READINESS_KEY)
            .map(String::as_str)
            .unwrap_or("Error")
    }
}

/// Parse an access level from a scalar daemon body.
///
/// The daemon answers per-node mode queries with either a bare boolean or a
/// bare integer depending on version. Junk defaults to 0 rather than
/// failing the whole pass; both fallback paths are logged so protocol drift
/// stays visible.
pub fn parse_access_level(body: &[u8]) -> AccessLevel {
    let text = String::from_utf8_lossy(body);
    let text = text.trim().to_ascii_lowercase();
    match text.as_str() {
        "false" => 0,
        "true" => 1,
        other => match other.parse::<AccessLevel>() {
            Ok(level) => {
                tracing::debug!(level, "access level answered as integer");
                level
            }
            Err(_) => {
                tracing::warn!(body = %other, "unparsable access level, assuming 0");
                0
            }
        },
    }
}
