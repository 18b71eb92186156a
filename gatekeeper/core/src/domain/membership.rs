// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Membership Records
//!
//! The allow-list is a table of `MembershipRecord`s keyed by a durable
//! `StableId`. A record provisioned by name only (no id yet) is *pending*;
//! the first connection observed under that name promotes it to *resolved*
//! by attaching the observed id. Promotion is one-way.
//!
//! Stable ids circulate in two textual encodings: the canonical hyphenated
//! form (36 chars) and a legacy compact form (32 hex chars). The store
//! accepts both and rewrites compact entries to canonical when it sees them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Durable, rename-proof identity of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(pub Uuid);

impl StableId {
    /// Parses either textual encoding (hyphenated or compact hex).
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s.trim()).ok().map(StableId)
    }

    /// Canonical hyphenated encoding, the only form we write back.
    pub fn canonical(&self) -> String {
        self.0.hyphenated().to_string()
    }

    /// Legacy separator-less encoding, matched but never written.
    pub fn compact(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One allow-list entry as persisted.
///
/// `stable_id == None` marks a pending record: a name pre-authorized
/// before its holder's id is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipRecord {
    pub stable_id: Option<StableId>,
    pub display_name: Option<String>,
}

impl MembershipRecord {
    pub fn is_pending(&self) -> bool {
        self.stable_id.is_none()
    }
}

/// Outcome of a reconciliation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied,
}
