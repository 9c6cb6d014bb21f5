// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Hub Connect Contributors

//! Status poller: tracks daemon readiness and drives reconciliation

use std::time::Duration;

use hub_connect_common::ProviderApi;

use crate::events::CoreEventHandler;
use crate::reconciler::full_reload;
use crate::state::CoreState;

/// Daemon readiness as derived from the last status call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    NotReady,
    Ready,
}

/// What one readiness observation means relative to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTransition {
    BecameReady,
    StillReady,
    BecameNotReady,
    StillNotReady,
}

/// Two-state poller over the daemon status endpoint.
///
/// The NotReady → Ready transition is the only event that triggers a full
/// reconciliation pass; repeated Ready polls refresh connection statuses
/// only, and NotReady outcomes surface nothing but a disconnected
/// indication. Status text for display: "No Connection" when unreachable,
/// else whatever state the daemon reports.
pub struct StatusPoller {
    readiness: Readiness,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPoller {
    pub fn new() -> Self {
        Self {
            readiness: Readiness::NotReady,
        }
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Fold one readiness observation into the state machine.
    pub fn observe(&mut self, ready: bool) -> PollTransition {
        let transition = match (self.readiness, ready) {
            (Readiness::NotReady, true) => PollTransition::BecameReady,
            (Readiness::Ready, true) => PollTransition::StillReady,
            (Readiness::Ready, false) => PollTransition::BecameNotReady,
            (Readiness::NotReady, false) => PollTransition::StillNotReady,
        };
        self.readiness = if ready {
            Readiness::Ready
        } else {
            Readiness::NotReady
        };
        transition
    }

    /// Execute one poll tick: status call, transition, and whichever
    /// follow-up work the transition calls for.
    pub async fn tick<H: CoreEventHandler>(
        &mut self,
        api: &dyn ProviderApi,
        state: &mut CoreState,
        handler: &H,
    ) {
        let status = api.status().await.ok();
        let ready = status.as_ref().map(|s| s.is_ready()).unwrap_or(false);
        let status_text = status
            .as_ref()
            .map(|s| s.state_text().to_string())
            .unwrap_or_else(|| "No Connection".to_string());

        let transition = self.observe(ready);
        state.set_connected(ready);
        handler.on_daemon_status(&status_text);

        match transition {
            PollTransition::BecameReady => {
                handler.on_readiness_changed(true);
                match full_reload(api).await {
                    Ok(outcome) => {
                        state.apply_reload(outcome);
                        handler.on_nodes_reloaded(state.snapshot());
                        handler.on_statuses_changed(state.hub_statuses());
                    }
                    Err(e) => {
                        // Previous snapshot stays authoritative.
                        tracing::warn!(error = %e, "full reload aborted");
                    }
                }
            }
            PollTransition::StillReady => match api.connection_statuses().await {
                Ok(statuses) => {
                    if state.set_statuses(statuses) {
                        handler.on_statuses_changed(state.hub_statuses());
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "status refresh failed");
                }
            },
            PollTransition::BecameNotReady => {
                handler.on_readiness_changed(false);
            }
            PollTransition::StillNotReady => {}
        }
    }

    /// Drive ticks on a fixed cadence, first tick immediately. Runs until
    /// the owning task is dropped; the daemon being away forever is not an
    /// error.
    pub async fn run<H: CoreEventHandler>(
        &mut self,
        api: &dyn ProviderApi,
        state: &mut CoreState,
        handler: &H,
        interval: Duration,
    ) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.tick(api, state, handler).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::events::NullEventHandler;
    use crate::support::MockApi;

    #[test]
    fn test_transition_matrix() {
        let mut poller = StatusPoller::new();
        assert_eq!(poller.observe(false), PollTransition::StillNotReady);
        assert_eq!(poller.observe(true), PollTransition::BecameReady);
        assert_eq!(poller.observe(true), PollTransition::StillReady);
        assert_eq!(poller.observe(false), PollTransition::BecameNotReady);
        assert_eq!(poller.observe(false), PollTransition::StillNotReady);
        assert_eq!(poller.observe(true), PollTransition::BecameReady);
    }

    #[tokio::test]
    async fn test_became_ready_triggers_full_reload_once() {
        let api = MockApi::default();
        api.add_lan_node("A", "10.0.0.1:61000", "node_id=abc");
        api.set_level("abc", 1);
        api.set_status("10.0.0.1:61000", "connected");
        api.set_ready(true);

        let mut poller = StatusPoller::new();
        let mut state = CoreState::new();

        poller.tick(&api, &mut state, &NullEventHandler).await;
        assert_eq!(state.snapshot().len(), 1);
        assert_eq!(state.hub_statuses()["10.0.0.1:61000"], "connected");
        let reloads_after_first = api.count_calls("lan_nodes");
        assert_eq!(reloads_after_first, 1);

        // Still ready: statuses only, no LAN/saved re-fetch
        poller.tick(&api, &mut state, &NullEventHandler).await;
        poller.tick(&api, &mut state, &NullEventHandler).await;
        assert_eq!(api.count_calls("lan_nodes"), 1);
        assert_eq!(api.count_calls("saved_nodes"), 1);
        assert!(api.count_calls("connection_statuses") >= 3);
    }

    #[tokio::test]
    async fn test_status_failure_keeps_previous_snapshot() {
        let api = MockApi::default();
        api.add_lan_node("A", "10.0.0.1:61000", "node_id=abc");
        api.set_level("abc", 1);
        api.set_ready(true);

        let mut poller = StatusPoller::new();
        let mut state = CoreState::new();
        poller.tick(&api, &mut state, &NullEventHandler).await;
        assert_eq!(state.snapshot().len(), 1);

        api.fail_op("status");
        poller.tick(&api, &mut state, &NullEventHandler).await;
        assert!(!state.is_connected());
        // Canonical list is not cleared by a lost daemon.
        assert_eq!(state.snapshot().len(), 1);
        assert_eq!(poller.readiness(), Readiness::NotReady);
    }

    #[tokio::test]
    async fn test_reready_triggers_another_full_reload() {
        let api = MockApi::default();
        api.add_lan_node("A", "10.0.0.1:61000", "node_id=abc");
        api.set_level("abc", 1);
        api.set_ready(true);

        let mut poller = StatusPoller::new();
        let mut state = CoreState::new();
        poller.tick(&api, &mut state, &NullEventHandler).await;

        api.set_ready(false);
        poller.tick(&api, &mut state, &NullEventHandler).await;

        api.set_ready(true);
        poller.tick(&api, &mut state, &NullEventHandler).await;
        assert_eq!(api.count_calls("lan_nodes"), 2);
    }

    #[tokio::test]
    async fn test_not_ready_fetches_nothing() {
        let api = MockApi::default();
        api.set_ready(false);

        let mut poller = StatusPoller::new();
        let mut state = CoreState::new();
        poller.tick(&api, &mut state, &NullEventHandler).await;
        poller.tick(&api, &mut state, &NullEventHandler).await;

        assert_eq!(api.count_calls("lan_nodes"), 0);
        assert_eq!(api.count_calls("connection_statuses"), 0);
    }
}
