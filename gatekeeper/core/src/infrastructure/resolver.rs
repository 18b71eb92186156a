// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # HTTP Identity Resolver
//!
//! `IdentityResolver` backed by an Ashcon-compatible account lookup
//! endpoint: `GET {base_url}/{name}` returning a JSON profile with the
//! canonical id, canonical-cased name, creation date, ordered name
//! history, and optional skin texture data.
//!
//! Every failure mode (timeout, non-2xx, malformed payload) collapses to
//! `None` with a logged warning; callers cannot and must not distinguish
//! "no such account" from "provider unreachable".

use crate::domain::config::ResolverConfig;
use crate::domain::identity::{IdentityProfile, IdentityResolver};
use crate::domain::membership::StableId;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

pub struct HttpIdentityResolver {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ProviderPayload {
    uuid: Option<String>,
    username: Option<String>,
    created_at: Option<String>,
    #[serde(default)]
    username_history: Vec<HistoryEntry>,
    textures: Option<Textures>,
}

#[derive(Deserialize)]
struct HistoryEntry {
    username: String,
}

#[derive(Deserialize)]
struct Textures {
    skin: Option<Skin>,
}

#[derive(Deserialize)]
struct Skin {
    url: Option<String>,
}

impl HttpIdentityResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("failed to build resolver HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// The provider reports creation either as a full RFC 3339 timestamp or
/// a bare date; both map to midnight UTC for the latter.
fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, name: &str) -> Option<IdentityProfile> {
        let lookup = name.trim().to_lowercase();
        let url = format!("{}/{lookup}", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(name = %lookup, %err, "identity provider request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(name = %lookup, status = %response.status(), "identity provider returned non-success");
            return None;
        }

        let payload: ProviderPayload = match response.json().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(name = %lookup, %err, "identity provider returned malformed payload");
                return None;
            }
        };

        let id = match payload.uuid.as_deref().and_then(StableId::parse) {
            Some(id) => id,
            None => {
                warn!(name = %lookup, "identity provider payload carried no usable id");
                return None;
            }
        };

        Some(IdentityProfile {
            id,
            name: payload.username.unwrap_or(lookup),
            created_at: payload.created_at.as_deref().and_then(parse_created_at),
            name_history: payload
                .username_history
                .into_iter()
                .map(|entry| entry.username)
                .collect(),
            avatar_url: payload
                .textures
                .and_then(|textures| textures.skin)
                .and_then(|skin| skin.url),
        })
    }
}
