// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Host Collaborator Seams
//!
//! The connection-lifecycle and command-delivery collaborators live in the
//! host process; this module defines the narrow interfaces the engine
//! needs from them. Neither side depends on the other's concrete type.

use crate::domain::membership::StableId;

/// A currently connected client as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedClient {
    pub id: StableId,
    pub name: String,
}

/// Live-session lookup and control, implemented by the host.
///
/// Session objects are assumed not safe to mutate off the host's primary
/// execution context: `notify` and `schedule_disconnect` must marshal
/// onto that context internally. Both are therefore fire-and-forget from
/// the engine's point of view.
pub trait SessionDirectory: Send + Sync {
    /// Exact-name lookup of a connected client.
    fn find_by_name(&self, name: &str) -> Option<ConnectedClient>;

    fn is_connected(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Deliver a text message to a connected client.
    fn notify(&self, id: StableId, message: &str);

    /// Terminate a connected session with the given message.
    fn schedule_disconnect(&self, id: StableId, message: &str);
}

/// Distinct grant per command verb, plus a wildcard covering all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Add,
    Remove,
    List,
    On,
    Off,
    Reload,
    Info,
    /// Wildcard: every whitelist capability.
    All,
}

impl Capability {
    /// Permission-node spelling used by host permission systems.
    pub fn node(&self) -> &'static str {
        match self {
            Capability::Add => "whitelist.add",
            Capability::Remove => "whitelist.remove",
            Capability::List => "whitelist.list",
            Capability::On => "whitelist.on",
            Capability::Off => "whitelist.off",
            Capability::Reload => "whitelist.reload",
            Capability::Info => "whitelist.info",
            Capability::All => "whitelist.*",
        }
    }
}

/// Whoever issued an administrative command: a logged-in operator, the
/// host console, or an RCON session. Replies may arrive from a worker
/// task after the issuing call has returned.
pub trait CommandIssuer: Send + Sync {
    fn has_capability(&self, capability: Capability) -> bool;

    /// Superuser override: bypasses per-verb capability checks.
    fn is_operator(&self) -> bool {
        false
    }

    fn reply(&self, message: &str);
}
