// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Node reconciliation: merging LAN-discovered and saved nodes into one
//! canonical list

use std::collections::{HashMap, HashSet};

use hub_connect_common::{AccessLevel, ProviderApi, Result, DISCONNECTED_LEVEL};

use crate::state::NodeSnapshot;

/// Result of one fully successful reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReloadOutcome {
    pub auto_level: AccessLevel,
    pub snapshot: NodeSnapshot,
    pub hub_statuses: HashMap<String, String>,
}

/// Run one full reconciliation pass.
///
/// Order: auto level, LAN nodes with per-node levels, saved nodes not
/// already seen, connection statuses. All-or-nothing: any fetch failure
/// aborts the pass and the caller keeps its previous snapshot.
///
/// Canonical list invariants: unique by node id; LAN-discovered entries
/// come first and win over saved entries with the same id. LAN nodes that
/// yield no id are still listed (level 0) but take no part in per-node
/// operations.
pub async fn full_reload(api: &dyn ProviderApi) -> Result<ReloadOutcome> {
    let auto_level = api.auto_access_level().await?;

    let mut snapshot = NodeSnapshot::new();
    let mut seen: HashSet<_> = HashSet::new();

    for node in api.lan_nodes().await? {
        match node.node_id() {
            Some(id) => {
                let level = api.access_level(&id).await?;
                seen.insert(id);
                snapshot.push(node, level);
            }
            None => {
                tracing::debug!(name = %node.name, address = %node.address,
                    "LAN node without id, display only");
                snapshot.push(node, DISCONNECTED_LEVEL);
            }
        }
    }

    for saved in api.saved_nodes().await? {
        if seen.contains(&saved.node_id) {
            continue;
        }
        let level = api.access_level(&saved.node_id).await?;
        seen.insert(saved.node_id.clone());
        snapshot.push(saved.to_node_info(), level);
    }

    let hub_statuses = api.connection_statuses().await?;

    Ok(ReloadOutcome {
        auto_level,
        snapshot,
        hub_statuses,
    })
}
