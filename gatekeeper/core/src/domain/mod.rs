// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain layer: membership records, persistence and resolver contracts,
//! command grammar, and the collaborator seams implemented by the host.

pub mod command;
pub mod config;
pub mod identity;
pub mod membership;
pub mod repository;
pub mod session;
