// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Reconciliation Engine
//!
//! The access-decision algorithm: given a freshly observed (stable id,
//! display name) pair, decide allow/deny against the membership store and
//! opportunistically repair drift between the two attributes.
//!
//! Ordering is a deliberate tie-break: an id match always wins over a
//! name match. The id is the durable identity; the name is whatever the
//! holder currently calls themselves. A name-only match is provisional
//! trust that hardens into a resolved record on first contact.

use crate::domain::membership::{AccessDecision, StableId};
use crate::domain::repository::{MembershipRepository, StoreError};
use std::sync::Arc;
use tracing::info;

pub struct ReconciliationEngine {
    store: Arc<dyn MembershipRepository>,
}

impl ReconciliationEngine {
    pub fn new(store: Arc<dyn MembershipRepository>) -> Self {
        Self { store }
    }

    /// Decide access for one observed (id, name) pair.
    ///
    /// 1. Resolved record under `id`? Repair the stored name if it
    ///    drifted, then allow. (Compact-encoded ids are rewritten to
    ///    canonical form inside the store lookup.)
    /// 2. Pending record under `name`? Attach `id` — the one-way
    ///    promotion — then allow.
    /// 3. Otherwise deny.
    ///
    /// The lookup and the subsequent write are separate round trips; two
    /// concurrent decisions may both attempt the same promotion. That is
    /// last-write-wins on `attach_id` and converges, because a given
    /// physical client always presents the same id.
    pub async fn decide(&self, id: StableId, name: &str) -> Result<AccessDecision, StoreError> {
        if let Some(record) = self.store.lookup_resolved(id).await? {
            if record.display_name.as_deref() != Some(name) {
                self.store.attach_name(id, name).await?;
                info!(
                    %id,
                    old = record.display_name.as_deref().unwrap_or(""),
                    new = name,
                    "updated drifted display name"
                );
            }
            return Ok(AccessDecision::Allowed);
        }

        if self.store.lookup_pending_by_name(name).await? {
            self.store.attach_id(name, id).await?;
            info!(%id, name, "promoted pending allow-list entry");
            return Ok(AccessDecision::Allowed);
        }

        Ok(AccessDecision::Denied)
    }
}
