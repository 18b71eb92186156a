// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure layer: concrete membership stores and the HTTP
//! identity resolver.

pub mod repositories;
pub mod resolver;
