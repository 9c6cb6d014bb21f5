// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Framework-agnostic connection reconciliation engine for Hub Connect
//!
//! This crate contains the state, polling, reconciliation, and command
//! logic shared by every front-end. Front-ends implement
//! [`CoreEventHandler`] and render whatever the core publishes.

pub mod commands;
pub mod enroll;
pub mod events;
pub mod poller;
pub mod reconciler;
pub mod state;
pub mod view_models;

#[cfg(test)]
pub(crate) mod support;

// Re-export commonly used types
pub use commands::{set_auto_mode, set_node_mode};
pub use enroll::{discover_hub, enroll_hub, HubIdentity};
pub use events::CoreEventHandler;
pub use poller::{PollTransition, Readiness, StatusPoller};
pub use reconciler::{full_reload, ReloadOutcome};
pub use state::{CoreState, NodeSnapshot};
pub use view_models::{node_rows, NodeRow};

// Re-export types from common crate for convenience
pub use hub_connect_common::{
    AccessLevel, ClientConfig, ConnectMode, DaemonClient, Error, NodeId, NodeInfo, ProviderApi,
    Result, SavedNodeInfo,
};
