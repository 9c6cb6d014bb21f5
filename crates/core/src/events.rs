// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Event handling trait for front-ends

use std::collections::HashMap;

use crate::state::NodeSnapshot;

/// Framework-agnostic event handler trait
///
/// Front-ends (CLI, tray, GUI) implement this to react to what the core
/// publishes. Implementations triggered from asynchronous completions must
/// marshal any rendering back onto their UI-owning thread; the core calls
/// these from its control flow and does not know about UI threads.
pub trait CoreEventHandler: Send + Sync {
    /// Called when daemon readiness flips in either direction.
    fn on_readiness_changed(&self, ready: bool);

    /// Called on every poll tick with display text for the daemon state,
    /// e.g. "Ready" or "No Connection".
    fn on_daemon_status(&self, text: &str);

    /// Called when a full reconciliation pass has been published.
    fn on_nodes_reloaded(&self, snapshot: &NodeSnapshot);

    /// Called when the per-address connection statuses changed.
    fn on_statuses_changed(&self, statuses: &HashMap<String, String>);
}

/// Handler that ignores everything; useful for headless operation.
pub struct NullEventHandler;

impl CoreEventHandler for NullEventHandler {
    fn on_readiness_changed(&self, _ready: bool) {}
    fn on_daemon_status(&self, _text: &str) {}
    fn on_nodes_reloaded(&self, _snapshot: &NodeSnapshot) {}
    fn on_statuses_changed(&self, _statuses: &HashMap<String, String>) {}
}
