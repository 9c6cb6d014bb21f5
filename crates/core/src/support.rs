// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Scripted daemon API for engine tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use hub_connect_common::{
    AccessLevel, ConnectMode, Error, NodeId, NodeInfo, NodeRegistration, ProviderApi, Result,
    SavedNodeInfo, StatusResponse,
};

/// In-memory `ProviderApi` with scripted data, per-operation failure
/// injection, and a call log for asserting order and idempotence.
#[derive(Default)]
pub struct MockApi {
    ready: AtomicBool,
    lan: Mutex<Vec<NodeInfo>>,
    saved: Mutex<Vec<SavedNodeInfo>>,
    levels: Mutex<HashMap<NodeId, AccessLevel>>,
    statuses: Mutex<HashMap<String, String>>,
    auto_level: Mutex<AccessLevel>,
    failing: Mutex<HashSet<&'static str>>,
    call_log: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn add_lan_node(&self, name: &str, address: &str, description: &str) {
        self.lan.lock().unwrap().push(NodeInfo {
            name: name.to_string(),
            address: address.to_string(),
            description: description.to_string(),
        });
    }

    pub fn add_saved_node(&self, name: &str, address: &str, node_id: &str) {
        self.saved.lock().unwrap().push(SavedNodeInfo {
            name: name.to_string(),
            address: address.to_string(),
            node_id: NodeId::from(node_id),
        });
    }

    pub fn set_level(&self, id: &str, level: AccessLevel) {
        self.levels.lock().unwrap().insert(NodeId::from(id), level);
    }

    pub fn set_status(&self, address: &str, status: &str) {
        self.statuses
            .lock()
            .unwrap()
            .insert(address.to_string(), status.to_string());
    }

    pub fn fail_op(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear();
    }

    pub fn count_calls(&self, op: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(op))
            .count()
    }

    fn record(&self, call: String) -> Result<()> {
        let op = call.split(' ').next().unwrap_or("").to_string();
        self.call_log.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(op.as_str()) {
            return Err(Error::Unreachable);
        }
        Ok(())
    }
}

#[async_trait]
impl ProviderApi for MockApi {
    async fn status(&self) -> Result<StatusResponse> {
        self.record("status".to_string())?;
        let state = if self.ready.load(Ordering::SeqCst) {
            "Ready"
        } else {
            "Starting"
        };
        let mut envs = HashMap::new();
        envs.insert("hostDirect".to_string(), state.to_string());
        Ok(StatusResponse { envs })
    }

    async fn lan_nodes(&self) -> Result<Vec<NodeInfo>> {
        self.record("lan_nodes".to_string())?;
        Ok(self.lan.lock().unwrap().clone())
    }

    async fn saved_nodes(&self) -> Result<Vec<SavedNodeInfo>> {
        self.record("saved_nodes".to_string())?;
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn connection_statuses(&self) -> Result<HashMap<String, String>> {
        self.record("connection_statuses".to_string())?;
        Ok(self.statuses.lock().unwrap().clone())
    }

    async fn access_level(&self, id: &NodeId) -> Result<AccessLevel> {
        self.record(format!("access_level {id}"))?;
        Ok(self.levels.lock().unwrap().get(id).copied().unwrap_or(0))
    }

    async fn register_node(&self, id: &NodeId, registration: &NodeRegistration) -> Result<()> {
        self.record(format!(
            "register_node {id} level={}",
            registration.access_level
        ))?;
        self.levels
            .lock()
            .unwrap()
            .insert(id.clone(), registration.access_level);
        Ok(())
    }

    async fn connect(&self, addresses: &[String], save: bool) -> Result<()> {
        self.record(format!("connect {} save={save}", addresses.join(",")))?;
        Ok(())
    }

    async fn disconnect(&self, addresses: &[String], save: bool) -> Result<()> {
        self.record(format!("disconnect {} save={save}", addresses.join(",")))?;
        Ok(())
    }

    async fn auto_access_level(&self) -> Result<AccessLevel> {
        self.record("auto_access_level".to_string())?;
        Ok(*self.auto_level.lock().unwrap())
    }

    async fn set_auto_access_level(&self, level: AccessLevel) -> Result<()> {
        self.record(format!("set_auto_access_level {level}"))?;
        *self.auto_level.lock().unwrap() = level;
        Ok(())
    }

    async fn set_connect_mode(&self, mode: ConnectMode, save: bool) -> Result<()> {
        self.record(format!("set_connect_mode {} save={save}", mode.as_str()))?;
        Ok(())
    }
}
