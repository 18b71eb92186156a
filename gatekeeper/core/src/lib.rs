// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # AEGIS Gatekeeper Core
//!
//! SQL-backed allow-list admission control: decides whether a returning
//! client (stable id + display name) may connect, repairing drift between
//! the two identifying attributes on the way, and mediates operator
//! `whitelist ...` commands against the same store.
//!
//! The host process (connection lifecycle, command delivery, chat
//! rendering) stays outside this crate; it plugs in through the
//! `ConnectionGate`, `CommandSink`, `SessionDirectory` and
//! `CommandIssuer` seams in `domain`.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::access_gate::AccessGate;
pub use application::dispatcher::CommandDispatcher;
pub use application::reconciliation::ReconciliationEngine;
pub use domain::config::{GatekeeperConfig, SharedConfig};
pub use domain::membership::{MembershipRecord, StableId};
