// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

// Hub Connect - Common Library
// Shared types, transport, and daemon client for CLI and GUI front-ends

pub mod config;
pub mod daemon_client;
pub mod error;
pub mod transport;
pub mod types;

pub use config::{load_client_config, ClientConfig};
pub use daemon_client::{ConnectMode, DaemonClient, ProviderApi};
pub use error::{Error, Result};
pub use transport::UnixHttp;
pub use types::{
    parse_access_level, AccessLevel, NodeId, NodeInfo, NodeRegistration, SavedNodeInfo,
    StatusResponse, DISCONNECTED_LEVEL,
};
