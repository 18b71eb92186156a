// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Whitelist Command Grammar
//!
//! Parses the `whitelist <verb> [target]` text surface. Verb matching is
//! case-insensitive; `rm` and `del` alias `remove`. A leading slash is
//! tolerated so the same parser serves both chat-preprocess and console
//! delivery. Unknown verbs parse to `None` so the host's own `whitelist`
//! handling stays untouched.

use crate::domain::session::Capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Add,
    Remove,
    List,
    On,
    Off,
    Reload,
    Info,
}

impl Verb {
    fn parse(token: &str) -> Option<Verb> {
        match token.to_ascii_lowercase().as_str() {
            "add" => Some(Verb::Add),
            "remove" | "rm" | "del" => Some(Verb::Remove),
            "list" => Some(Verb::List),
            "on" => Some(Verb::On),
            "off" => Some(Verb::Off),
            "reload" => Some(Verb::Reload),
            "info" => Some(Verb::Info),
            _ => None,
        }
    }

    pub fn capability(self) -> Capability {
        match self {
            Verb::Add => Capability::Add,
            Verb::Remove => Capability::Remove,
            Verb::List => Capability::List,
            Verb::On => Capability::On,
            Verb::Off => Capability::Off,
            Verb::Reload => Capability::Reload,
            Verb::Info => Capability::Info,
        }
    }

    pub fn requires_target(self) -> bool {
        matches!(self, Verb::Add | Verb::Remove | Verb::Info)
    }

    pub fn usage(self) -> &'static str {
        match self {
            Verb::Add => "whitelist add <name>",
            Verb::Remove => "whitelist remove <name>",
            Verb::Info => "whitelist info <name>",
            Verb::List => "whitelist list",
            Verb::On => "whitelist on",
            Verb::Off => "whitelist off",
            Verb::Reload => "whitelist reload",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistCommand {
    pub verb: Verb,
    pub target: Option<String>,
}

impl WhitelistCommand {
    /// Parses a delivered command line. `None` means "not ours": either
    /// not a whitelist command at all, or a subcommand we don't mediate.
    pub fn parse(line: &str) -> Option<WhitelistCommand> {
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let mut tokens = line.split_whitespace();
        let head = tokens.next()?;
        if !head.eq_ignore_ascii_case("whitelist") {
            return None;
        }
        let verb = Verb::parse(tokens.next()?)?;
        let target = tokens.next().map(str::to_string);
        Some(WhitelistCommand { verb, target })
    }
}
