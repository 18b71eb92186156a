// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Gatekeeper Configuration
//!
//! YAML-backed runtime configuration, passed into each component at
//! construction instead of being read from ambient global state. The
//! `whitelist on|off` verbs flip `enabled` and persist it; `whitelist
//! reload` rereads the file in place, so new database settings take
//! effect on the next query.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// Master switch. When false the access gate allows everyone.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub messages: MessagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `postgres://gatekeeper@db/allowlist`.
    #[serde(default)]
    pub url: String,

    /// Table and column names are configurable so the engine can sit on
    /// top of pre-existing schemas.
    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_column_id")]
    pub column_stable_id: String,

    #[serde(default = "default_column_name")]
    pub column_display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_resolver_url")]
    pub base_url: String,

    /// Bounded timeout for provider calls; a stall counts as NotFound.
    #[serde(default = "default_resolver_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_msg_not_allowlisted")]
    pub not_allowlisted: String,

    #[serde(default = "default_msg_store_error")]
    pub store_error: String,

    #[serde(default = "default_msg_removed")]
    pub removed: String,

    #[serde(default = "default_msg_whitelisted")]
    pub whitelisted_notice: String,
}

fn default_enabled() -> bool {
    true
}
fn default_table() -> String {
    "whitelist".to_string()
}
fn default_column_id() -> String {
    "uuid".to_string()
}
fn default_column_name() -> String {
    "username".to_string()
}
fn default_resolver_url() -> String {
    "https://api.ashcon.app/mojang/v2/user".to_string()
}
fn default_resolver_timeout() -> u64 {
    4
}
fn default_user_agent() -> String {
    "aegis-gatekeeper".to_string()
}
fn default_msg_not_allowlisted() -> String {
    "You're not on our whitelist.".to_string()
}
fn default_msg_store_error() -> String {
    "Whitelist check failed. Please try again later.".to_string()
}
fn default_msg_removed() -> String {
    "You have been removed from our whitelist".to_string()
}
fn default_msg_whitelisted() -> String {
    "You have been whitelisted!".to_string()
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            database: DatabaseConfig::default(),
            resolver: ResolverConfig::default(),
            messages: MessagesConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            table: default_table(),
            column_stable_id: default_column_id(),
            column_display_name: default_column_name(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: default_resolver_url(),
            timeout_secs: default_resolver_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            not_allowlisted: default_msg_not_allowlisted(),
            store_error: default_msg_store_error(),
            removed: default_msg_removed(),
            whitelisted_notice: default_msg_whitelisted(),
        }
    }
}

impl GatekeeperConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse gatekeeper config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
    }
}

/// Shared handle over the live configuration. Cheap to clone; readers
/// never block on I/O (reload swaps the value under a short write lock).
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<GatekeeperConfig>>,
    path: Option<PathBuf>,
}

impl SharedConfig {
    pub fn new(config: GatekeeperConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: None,
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = GatekeeperConfig::from_file(&path)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(config)),
            path: Some(path),
        })
    }

    pub fn snapshot(&self) -> GatekeeperConfig {
        self.inner.read().expect("config lock poisoned").clone()
    }

    pub fn enabled(&self) -> bool {
        self.inner.read().expect("config lock poisoned").enabled
    }

    /// Flip the master switch, persisting when file-backed.
    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        {
            let mut guard = self.inner.write().expect("config lock poisoned");
            guard.enabled = enabled;
        }
        self.save()
    }

    /// Reread the backing file. No-op for configs constructed in memory.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let fresh = GatekeeperConfig::from_file(path)?;
        *self.inner.write().expect("config lock poisoned") = fresh;
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let yaml = serde_yaml::to_string(&self.snapshot()).context("failed to serialize config")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("failed to write config file {}", path.display()))
    }
}
