// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! View models - node data prepared for table display

use std::collections::HashMap;

use hub_connect_common::{AccessLevel, NodeId, NodeInfo};
use serde::Serialize;

use crate::state::NodeSnapshot;

/// One table row: a pure projection of (node, level, status map) with no
/// hidden state. The status is joined by address at render time and never
/// merged into the canonical list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    pub name: String,
    pub address: String,
    pub node_id: Option<NodeId>,
    pub status: String,
    pub access_level: AccessLevel,
    pub connected: bool,
}

impl NodeRow {
    pub fn from_parts(
        node: &NodeInfo,
        level: AccessLevel,
        statuses: &HashMap<String, String>,
    ) -> Self {
        Self {
            name: node.name.clone(),
            address: node.address.clone(),
            node_id: node.node_id(),
            status: statuses
                .get(&node.address)
                .cloned()
                .unwrap_or_else(|| "-".to_string()),
            access_level: level,
            connected: level > 0,
        }
    }
}

/// Project a snapshot plus status map into display rows.
pub fn node_rows(snapshot: &NodeSnapshot, statuses: &HashMap<String, String>) -> Vec<NodeRow> {
    snapshot
        .iter()
        .map(|(node, level)| NodeRow::from_parts(node, level, statuses))
        .collect()
}
