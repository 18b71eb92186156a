// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Access Gate
//!
//! Synchronous entry point for the connection-lifecycle collaborator:
//! wraps the reconciliation engine with fail-closed error handling and a
//! human-readable denial reason. The host guarantees `evaluate` runs off
//! its primary serving context, so awaiting store I/O here is fine.

use crate::application::reconciliation::ReconciliationEngine;
use crate::domain::config::SharedConfig;
use crate::domain::membership::{AccessDecision, StableId};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

/// Why a connection attempt was refused. `StoreUnavailable` is kept
/// distinct from `NotAllowlisted` so operators can tell outages from
/// legitimate denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    NotAllowlisted,
    StoreUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Deny(Denial),
}

/// Pre-connect hook implemented by `AccessGate` and invoked by the
/// host's connection-lifecycle collaborator.
#[async_trait]
pub trait ConnectionGate: Send + Sync {
    async fn evaluate(&self, id: StableId, name: &str) -> GateDecision;
}

pub struct AccessGate {
    engine: ReconciliationEngine,
    config: SharedConfig,
}

impl AccessGate {
    pub fn new(engine: ReconciliationEngine, config: SharedConfig) -> Self {
        Self { engine, config }
    }

    pub fn from_store(
        store: Arc<dyn crate::domain::repository::MembershipRepository>,
        config: SharedConfig,
    ) -> Self {
        Self::new(ReconciliationEngine::new(store), config)
    }
}

#[async_trait]
impl ConnectionGate for AccessGate {
    async fn evaluate(&self, id: StableId, name: &str) -> GateDecision {
        if !self.config.enabled() {
            return GateDecision::Allow;
        }

        match self.engine.decide(id, name).await {
            Ok(AccessDecision::Allowed) => GateDecision::Allow,
            Ok(AccessDecision::Denied) => GateDecision::Deny(Denial {
                kind: DenialKind::NotAllowlisted,
                message: self.config.snapshot().messages.not_allowlisted,
            }),
            Err(err) => {
                // Fail closed: never let a store outage open the door,
                // and never leak the raw error to the connecting client.
                error!(%id, name, %err, "whitelist check failed");
                GateDecision::Deny(Denial {
                    kind: DenialKind::StoreUnavailable,
                    message: self.config.snapshot().messages.store_error,
                })
            }
        }
    }
}
