// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! User-initiated intents translated into ordered daemon calls
//!
//! Commands are fire-and-forget: the local state is updated optimistically,
//! daemon call failures are only logged, and the next reconciliation pass
//! re-establishes truth.

use hub_connect_common::{AccessLevel, ConnectMode, NodeId, NodeRegistration, ProviderApi};

use crate::state::CoreState;

/// Set a node's access level and connect or disconnect it.
///
/// Registration (PUT above zero, DELETE at zero) goes first, then the
/// connect/disconnect request with persistence. The optimistic local update
/// happens before either call.
pub async fn set_node_mode(
    api: &dyn ProviderApi,
    state: &mut CoreState,
    id: &NodeId,
    level: AccessLevel,
) {
    let Some((node, _)) = state.snapshot().find(id) else {
        tracing::warn!(%id, "set_node_mode for unknown node ignored");
        return;
    };
    let address = node.address.clone();
    let host_name = node.name.clone();

    state.set_level(id, level);

    let registration = NodeRegistration {
        address: address.clone(),
        host_name,
        access_level: level,
    };
    if let Err(e) = api.register_node(id, &registration).await {
        tracing::warn!(%id, error = %e, "node registration not acknowledged");
    }

    let addresses = [address];
    let result = if level > 0 {
        api.connect(&addresses, true).await
    } else {
        api.disconnect(&addresses, true).await
    };
    if let Err(e) = result {
        tracing::warn!(%id, error = %e, "connection change not acknowledged");
    }
}

/// Set the daemon-wide auto mode.
///
/// The per-node auto level goes first, then the global mode switch with
/// persistence; the daemon applies the global mode using the just-set
/// level, so the order is load-bearing.
pub async fn set_auto_mode(api: &dyn ProviderApi, state: &mut CoreState, level: AccessLevel) {
    state.set_auto_level(level);

    if let Err(e) = api.set_auto_access_level(level).await {
        tracing::warn!(level, error = %e, "auto access level not acknowledged");
    }

    let mode = if level > 0 {
        ConnectMode::Auto
    } else {
        ConnectMode::Manual
    };
    if let Err(e) = api.set_connect_mode(mode, true).await {
        tracing::warn!(?mode, error = %e, "connect mode not acknowledged");
    }
}
