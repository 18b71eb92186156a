// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Membership Store
//!
//! Production `MembershipRepository` backed by a single allow-list table
//! via `sqlx`. Table and column names come from configuration so the
//! engine can sit on top of pre-existing schemas; identifiers are
//! validated before interpolation (values are always bound).
//!
//! Conflicting writes are serialized by a unique index on the stable-id
//! column (NULLs exempt, so any number of pending rows coexist).
//! `upsert_resolved` uses the native `ON CONFLICT .. DO UPDATE`; a
//! `Conflict` surfacing anyway (legacy schema with a different unique
//! constraint) falls back to a plain name update.

use crate::domain::config::DatabaseConfig;
use crate::domain::membership::{MembershipRecord, StableId};
use crate::domain::repository::{MembershipRepository, StoreError};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::{info, warn};

/// A config-supplied SQL identifier: ASCII alphanumerics and underscores
/// only, within PostgreSQL's length limit.
fn valid_ident(s: &str) -> bool {
    !s.is_empty() && s.len() <= 63 && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub struct PostgresMembershipStore {
    pool: PgPool,
    table: String,
    col_id: String,
    col_name: String,
}

impl PostgresMembershipStore {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Result<Self> {
        for ident in [
            &config.table,
            &config.column_stable_id,
            &config.column_display_name,
        ] {
            if !valid_ident(ident) {
                bail!("invalid SQL identifier in database config: {ident:?}");
            }
        }
        Ok(Self {
            pool,
            table: config.table.clone(),
            col_id: config.column_stable_id.clone(),
            col_name: config.column_display_name.clone(),
        })
    }

    /// Lazy connection: no I/O until the first query.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPool::connect_lazy(&config.url)
            .with_context(|| format!("invalid database url {:?}", config.url))?;
        Self::new(pool, config)
    }

    /// Create the allow-list table and its indexes if absent. Called at
    /// host startup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let table = &self.table;
        let (col_id, col_name) = (&self.col_id, &self.col_name);

        let create = format!(
            r#"CREATE TABLE IF NOT EXISTS "{table}" (
                "{col_id}" varchar(36) DEFAULT NULL,
                "{col_name}" varchar(100) DEFAULT NULL
            )"#
        );
        sqlx::query(&create).execute(&self.pool).await?;

        let unique_id = format!(
            r#"CREATE UNIQUE INDEX IF NOT EXISTS "idx_{table}_{col_id}" ON "{table}" ("{col_id}")"#
        );
        sqlx::query(&unique_id).execute(&self.pool).await?;

        let name_idx = format!(
            r#"CREATE INDEX IF NOT EXISTS "idx_{table}_{col_name}" ON "{table}" ("{col_name}")"#
        );
        sqlx::query(&name_idx).execute(&self.pool).await?;

        info!(table = %self.table, "allow-list schema ensured");
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for PostgresMembershipStore {
    async fn lookup_resolved(&self, id: StableId) -> Result<Option<MembershipRecord>, StoreError> {
        let sql = format!(
            r#"SELECT "{0}", "{1}" FROM "{2}" WHERE "{0}" = $1 OR REPLACE("{0}", '-', '') = $2 LIMIT 1"#,
            self.col_id, self.col_name, self.table
        );
        let row = sqlx::query(&sql)
            .bind(id.canonical())
            .bind(id.compact())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let stored: Option<String> = row.get(0);
        let display_name: Option<String> = row.get(1);

        // Permanent repair of historical compact-encoded entries.
        if let Some(stored) = stored.filter(|s| s.len() == 32) {
            let fix = format!(
                r#"UPDATE "{0}" SET "{1}" = $1 WHERE "{1}" = $2"#,
                self.table, self.col_id
            );
            sqlx::query(&fix)
                .bind(id.canonical())
                .bind(&stored)
                .execute(&self.pool)
                .await?;
            warn!(from = %stored, to = %id, "rewrote compact-encoded stable id to canonical form");
        }

        Ok(Some(MembershipRecord {
            stable_id: Some(id),
            display_name,
        }))
    }

    async fn lookup_pending_by_name(&self, name: &str) -> Result<bool, StoreError> {
        let sql = format!(
            r#"SELECT 1 FROM "{0}" WHERE LOWER("{1}") = LOWER($1) AND ("{2}" IS NULL OR "{2}" = '') LIMIT 1"#,
            self.table, self.col_name, self.col_id
        );
        let row = sqlx::query(&sql).bind(name).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn attach_name(&self, id: StableId, name: &str) -> Result<(), StoreError> {
        let sql = format!(
            r#"UPDATE "{0}" SET "{1}" = $1 WHERE "{2}" = $2"#,
            self.table, self.col_name, self.col_id
        );
        sqlx::query(&sql)
            .bind(name)
            .bind(id.canonical())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn attach_id(&self, name: &str, id: StableId) -> Result<(), StoreError> {
        let sql = format!(
            r#"UPDATE "{0}" SET "{1}" = $1 WHERE LOWER("{2}") = LOWER($2) AND ("{1}" IS NULL OR "{1}" = '')"#,
            self.table, self.col_id, self.col_name
        );
        sqlx::query(&sql)
            .bind(id.canonical())
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_resolved(&self, id: StableId, name: &str) -> Result<(), StoreError> {
        let sql = format!(
            r#"INSERT INTO "{0}" ("{1}", "{2}") VALUES ($1, $2)"#,
            self.table, self.col_id, self.col_name
        );
        sqlx::query(&sql)
            .bind(id.canonical())
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_pending(&self, name: &str) -> Result<(), StoreError> {
        let sql = format!(
            r#"INSERT INTO "{0}" ("{1}", "{2}")
               SELECT CAST(NULL AS varchar), $1
               WHERE NOT EXISTS (
                   SELECT 1 FROM "{0}" WHERE LOWER("{2}") = LOWER($1) AND ("{1}" IS NULL OR "{1}" = '')
               )"#,
            self.table, self.col_id, self.col_name
        );
        sqlx::query(&sql).bind(name).execute(&self.pool).await?;
        Ok(())
    }

    async fn upsert_resolved(&self, id: StableId, name: &str) -> Result<(), StoreError> {
        // Rewrite a compact-encoded legacy row to canonical form first,
        // otherwise the conflict target would miss it and a second row
        // would be inserted for the same id.
        let normalize = format!(
            r#"UPDATE "{0}" SET "{1}" = $1 WHERE REPLACE("{1}", '-', '') = $2 AND "{1}" <> $1"#,
            self.table, self.col_id
        );
        let fixed = sqlx::query(&normalize)
            .bind(id.canonical())
            .bind(id.compact())
            .execute(&self.pool)
            .await?;
        if fixed.rows_affected() > 0 {
            warn!(%id, "rewrote compact-encoded stable id to canonical form");
        }

        let sql = format!(
            r#"INSERT INTO "{0}" ("{1}", "{2}") VALUES ($1, $2)
               ON CONFLICT ("{1}") DO UPDATE SET "{2}" = EXCLUDED."{2}""#,
            self.table, self.col_id, self.col_name
        );
        let result = sqlx::query(&sql)
            .bind(id.canonical())
            .bind(name)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(StoreError::from);

        match result {
            Err(StoreError::Conflict(_)) => self.attach_name(id, name).await,
            other => other,
        }
    }

    async fn delete_by_id(&self, id: StableId) -> Result<u64, StoreError> {
        let sql = format!(
            r#"DELETE FROM "{0}" WHERE "{1}" = $1 OR REPLACE("{1}", '-', '') = $2"#,
            self.table, self.col_id
        );
        let result = sqlx::query(&sql)
            .bind(id.canonical())
            .bind(id.compact())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64, StoreError> {
        let sql = format!(
            r#"DELETE FROM "{0}" WHERE LOWER("{1}") = LOWER($1)"#,
            self.table, self.col_name
        );
        let result = sqlx::query(&sql).bind(name).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn list_names(&self) -> Result<Vec<String>, StoreError> {
        let sql = format!(
            r#"SELECT DISTINCT "{0}" FROM "{1}" WHERE "{0}" IS NOT NULL AND "{0}" <> ''"#,
            self.col_name, self.table
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(|row| row.get::<String, _>(0)).collect())
    }
}
