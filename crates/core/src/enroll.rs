// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Hub enrollment: registering a hub from a bare host:port
//!
//! Enrollment talks to the remote hub itself (not the local daemon) to
//! learn its identity, then registers and connects it through the normal
//! command path. The outbound call must never block the polling loop, so
//! callers run it on its own task and rejoin only to publish the result.

use std::time::Duration;

use hub_connect_common::{Error, NodeId, NodeRegistration, ProviderApi, Result};

/// Bound on the identity request to the remote hub. The hub address comes
/// from user input, so an unreachable host must fail promptly.
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity a hub reports about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubIdentity {
    pub node_id: NodeId,
    pub host_name: String,
}

/// Ask a hub at `host:port` for its identity.
///
/// The response body must be exactly two space-separated tokens:
/// `<nodeId> <hostName>`. Anything else is a user-facing
/// `BadRemoteResponse`, distinct from daemon-unreachable failures.
pub async fn discover_hub(http: &reqwest::Client, host_port: &str) -> Result<HubIdentity> {
    let url = format!("http://{host_port}/node_id/");

    let response = http
        .get(&url)
        .timeout(DISCOVERY_TIMEOUT)
        .send()
        .await
        .map_err(|e| {
            tracing::debug!(url, error = %e, "hub discovery request failed");
            Error::BadRemoteResponse(format!("Cannot connect to {host_port}"))
        })?;

    if !response.status().is_success() {
        return Err(Error::BadRemoteResponse(format!("Bad answer from {url}.")));
    }

    let body = response
        .text()
        .await
        .map_err(|_| Error::BadRemoteResponse(format!("Bad answer from {url}.")))?;

    parse_identity(&body).ok_or_else(|| Error::BadRemoteResponse(format!("Bad answer from {url}.")))
}

/// Parse the two-token identity body, rejecting everything else.
fn parse_identity(body: &str) -> Option<HubIdentity> {
    let mut tokens = body.split_whitespace();
    let node_id = tokens.next()?;
    let host_name = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(HubIdentity {
        node_id: NodeId::from(node_id),
        host_name: host_name.to_string(),
    })
}

/// Discover a hub and register + connect it with the daemon.
///
/// On success the caller is expected to run a full reconciliation pass
/// (and clear its input field). Discovery failures are reported without
/// touching the daemon.
pub async fn enroll_hub(
    api: &dyn ProviderApi,
    http: &reqwest::Client,
    host_port: &str,
) -> Result<HubIdentity> {
    let identity = discover_hub(http, host_port).await?;

    let registration = NodeRegistration {
        address: host_port.to_string(),
        host_name: identity.host_name.clone(),
        access_level: 1,
    };
    api.register_node(&identity.node_id, &registration).await?;
    api.connect(&[host_port.to_string()], true).await?;

    Ok(identity)
}
