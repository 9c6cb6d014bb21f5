// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Framework-agnostic application state

use std::collections::HashMap;

use hub_connect_common::{AccessLevel, NodeId, NodeInfo};

use crate::reconciler::ReloadOutcome;
use crate::view_models::{node_rows, NodeRow};

/// One consistent published pass: the canonical node list and its access
/// levels, always the same length and swapped as a unit. A reader never
/// observes a list and levels from different passes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSnapshot {
    nodes: Vec<NodeInfo>,
    levels: Vec<AccessLevel>,
}

impl NodeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeInfo, level: AccessLevel) {
        self.nodes.push(node);
        self.levels.push(level);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }

    pub fn levels(&self) -> &[AccessLevel] {
        &self.levels
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeInfo, AccessLevel)> {
        self.nodes.iter().zip(self.levels.iter().copied())
    }

    /// Find a node by id together with its current level.
    pub fn find(&self, id: &NodeId) -> Option<(&NodeInfo, AccessLevel)> {
        self.iter()
            .find(|(node, _)| node.node_id().as_ref() == Some(id))
    }

    /// Overwrite the level of the node with the given id.
    pub fn set_level(&mut self, id: &NodeId, level: AccessLevel) -> bool {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.node_id().as_ref() == Some(id) {
                self.levels[index] = level;
                return true;
            }
        }
        false
    }
}

/// Core application state (framework-agnostic)
///
/// Owns everything the excluded UI layer renders: the canonical node list
/// with per-node levels, the connection status map, the daemon-wide auto
/// level, and the daemon readiness flag. No ambient globals.
#[derive(Debug, Default)]
pub struct CoreState {
    snapshot: NodeSnapshot,
    hub_statuses: HashMap<String, String>,
    auto_level: AccessLevel,
    connected: bool,
}

impl CoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &NodeSnapshot {
        &self.snapshot
    }

    pub fn hub_statuses(&self) -> &HashMap<String, String> {
        &self.hub_statuses
    }

    pub fn auto_level(&self) -> AccessLevel {
        self.auto_level
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Publish a fully successful reconciliation pass. The snapshot, auto
    /// level, and status map are replaced together.
    pub fn apply_reload(&mut self, outcome: ReloadOutcome) {
        self.snapshot = outcome.snapshot;
        self.auto_level = outcome.auto_level;
        self.hub_statuses = outcome.hub_statuses;
    }

    /// Replace the connection status map. Returns true when it changed.
    pub fn set_statuses(&mut self, statuses: HashMap<String, String>) -> bool {
        if statuses == self.hub_statuses {
            return false;
        }
        self.hub_statuses = statuses;
        true
    }

    /// Optimistic local level update ahead of daemon acknowledgment; the
    /// next reconciliation pass is authoritative.
    pub fn set_level(&mut self, id: &NodeId, level: AccessLevel) -> bool {
        self.snapshot.set_level(id, level)
    }

    pub fn set_auto_level(&mut self, level: AccessLevel) {
        self.auto_level = level;
    }

    /// Project the current state into display rows.
    pub fn rows(&self) -> Vec<NodeRow> {
        node_rows(&self.snapshot, &self.hub_statuses)
    }
}
