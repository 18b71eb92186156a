// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application layer: the reconciliation decision algorithm and the two
//! host-facing entry points built on it (access gate, command dispatcher).

pub mod access_gate;
pub mod dispatcher;
pub mod reconciliation;
