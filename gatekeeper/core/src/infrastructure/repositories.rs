// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! In-memory membership store for development and testing.
//!
//! Mirrors the SQL store's observable behavior, including the quirks:
//! rows hold raw textual id encodings, compact-encoded ids match and get
//! rewritten on lookup, name comparisons ignore case, and a pending row
//! is one whose id cell is NULL or empty.

use crate::domain::membership::{MembershipRecord, StableId};
use crate::domain::repository::{MembershipRepository, StoreError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::warn;

pub mod postgres;

#[derive(Debug, Clone)]
struct RawRow {
    id: Option<String>,
    name: Option<String>,
}

impl RawRow {
    fn is_pending(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
    }

    fn matches_id(&self, id: StableId) -> bool {
        match self.id.as_deref() {
            Some(stored) => stored == id.canonical() || stored == id.compact(),
            None => false,
        }
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|stored| stored.to_lowercase() == name.to_lowercase())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryMembershipStore {
    rows: Arc<Mutex<Vec<RawRow>>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row with arbitrary raw cell contents, e.g. a
    /// compact-encoded id left behind by an older tool.
    pub fn insert_raw(&self, id: Option<String>, name: Option<String>) {
        self.rows.lock().unwrap().push(RawRow { id, name });
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Raw id cells in insertion order, for asserting on stored encodings.
    pub fn raw_ids(&self) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter_map(|row| row.id.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RawRow>> {
        self.rows.lock().expect("store lock poisoned")
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipStore {
    async fn lookup_resolved(&self, id: StableId) -> Result<Option<MembershipRecord>, StoreError> {
        let mut rows = self.lock();
        for row in rows.iter_mut() {
            if row.matches_id(id) {
                if row.id.as_deref().is_some_and(|s| s.len() == 32) {
                    warn!(%id, "rewrote compact-encoded stable id to canonical form");
                    row.id = Some(id.canonical());
                }
                return Ok(Some(MembershipRecord {
                    stable_id: Some(id),
                    display_name: row.name.clone(),
                }));
            }
        }
        Ok(None)
    }

    async fn lookup_pending_by_name(&self, name: &str) -> Result<bool, StoreError> {
        let rows = self.lock();
        Ok(rows.iter().any(|row| row.is_pending() && row.matches_name(name)))
    }

    async fn attach_name(&self, id: StableId, name: &str) -> Result<(), StoreError> {
        let mut rows = self.lock();
        for row in rows.iter_mut() {
            if row.matches_id(id) {
                row.name = Some(name.to_string());
            }
        }
        Ok(())
    }

    async fn attach_id(&self, name: &str, id: StableId) -> Result<(), StoreError> {
        let mut rows = self.lock();
        for row in rows.iter_mut() {
            if row.is_pending() && row.matches_name(name) {
                row.id = Some(id.canonical());
            }
        }
        Ok(())
    }

    async fn insert_resolved(&self, id: StableId, name: &str) -> Result<(), StoreError> {
        let mut rows = self.lock();
        if rows.iter().any(|row| row.matches_id(id)) {
            return Err(StoreError::Conflict(format!("stable id {id} already present")));
        }
        rows.push(RawRow {
            id: Some(id.canonical()),
            name: Some(name.to_string()),
        });
        Ok(())
    }

    async fn insert_pending(&self, name: &str) -> Result<(), StoreError> {
        let mut rows = self.lock();
        if rows.iter().any(|row| row.is_pending() && row.matches_name(name)) {
            return Ok(());
        }
        rows.push(RawRow {
            id: None,
            name: Some(name.to_string()),
        });
        Ok(())
    }

    async fn upsert_resolved(&self, id: StableId, name: &str) -> Result<(), StoreError> {
        let mut rows = self.lock();
        for row in rows.iter_mut() {
            if row.matches_id(id) {
                row.id = Some(id.canonical());
                row.name = Some(name.to_string());
                return Ok(());
            }
        }
        rows.push(RawRow {
            id: Some(id.canonical()),
            name: Some(name.to_string()),
        });
        Ok(())
    }

    async fn delete_by_id(&self, id: StableId) -> Result<u64, StoreError> {
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|row| !row.matches_id(id));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64, StoreError> {
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|row| !row.matches_name(name));
        Ok((before - rows.len()) as u64)
    }

    async fn list_names(&self) -> Result<Vec<String>, StoreError> {
        let rows = self.lock();
        let mut names: Vec<String> = Vec::new();
        for row in rows.iter() {
            if let Some(name) = row.name.as_deref() {
                if !name.is_empty() && !names.iter().any(|seen| seen == name) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }
}
