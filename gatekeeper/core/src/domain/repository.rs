// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Membership Repository Interface
//!
//! Persistence contract for the allow-list, following the repository
//! pattern: trait defined in the domain layer, implementations in
//! `crate::infrastructure`.
//!
//! | Trait | Implementations |
//! |-------|-----------------|
//! | `MembershipRepository` | `InMemoryMembershipStore`, `PostgresMembershipStore` |
//!
//! Every operation is one independent round trip; no multi-statement
//! transaction is assumed. Conflicting writes are serialized by the
//! store's own unique constraint on the stable-id column, not by any
//! client-side lock.

use crate::domain::membership::{MembershipRecord, StableId};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection or query failure. The access gate fails closed on this.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Duplicate-key violation on insert.
    #[error("conflicting entry: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// CRUD primitives over the allow-list table. Pure mechanism, no policy;
/// the reconciliation engine owns ordering and drift repair.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find the resolved record for `id`, matching either textual
    /// encoding. A compact-encoded hit is rewritten to canonical form as
    /// a side effect.
    async fn lookup_resolved(&self, id: StableId) -> Result<Option<MembershipRecord>, StoreError>;

    /// True iff a pending record (no id) exists under `name`.
    /// Name comparison is case-insensitive; stored casing is preserved.
    async fn lookup_pending_by_name(&self, name: &str) -> Result<bool, StoreError>;

    /// Update the display name of the resolved record matching `id`.
    async fn attach_name(&self, id: StableId, name: &str) -> Result<(), StoreError>;

    /// Promote the pending record matching `name` by attaching `id`.
    /// Last write wins if two promotions race; a given physical client
    /// always presents the same id, so convergence is unaffected.
    async fn attach_id(&self, name: &str, id: StableId) -> Result<(), StoreError>;

    /// Create a resolved record. `Conflict` if `id` is already taken.
    async fn insert_resolved(&self, id: StableId, name: &str) -> Result<(), StoreError>;

    /// Create a pending record; silent no-op if a pending record with
    /// that name already exists.
    async fn insert_pending(&self, name: &str) -> Result<(), StoreError>;

    /// Insert-or-update keyed by `id`, updating the name on conflict.
    async fn upsert_resolved(&self, id: StableId, name: &str) -> Result<(), StoreError>;

    /// Delete by id (either encoding), returning the number of rows removed.
    async fn delete_by_id(&self, id: StableId) -> Result<u64, StoreError>;

    /// Delete by name (case-insensitive), returning the number of rows removed.
    async fn delete_by_name(&self, name: &str) -> Result<u64, StoreError>;

    /// Distinct non-empty display names, unordered.
    async fn list_names(&self) -> Result<Vec<String>, StoreError>;
}
