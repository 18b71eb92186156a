// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Identity-verification provider contract.
//!
//! Maps a display name to a canonical account profile via an external
//! provider. Used only by the "add by name while not connected" and
//! `info` command paths, so a name that does not correspond to a real
//! account is never provisioned.

use crate::domain::membership::StableId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Canonical account data returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub id: StableId,
    /// Canonical-cased account name.
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Ordered name-change history, oldest first.
    pub name_history: Vec<String>,
    pub avatar_url: Option<String>,
}

/// Resolver over the external identity-verification provider.
///
/// Timeout, non-success response and malformed payload all collapse to
/// `None`: callers must not distinguish "no such account" from "provider
/// unreachable" when deciding whether to provision an entry (fail closed
/// rather than allow-listing unverifiable names).
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Option<IdentityProfile>;
}
