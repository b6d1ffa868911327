//! User table queries
//!
//! Bulk insert and bulk delete each run inside one transaction so a batch is
//! stored (or removed) entirely or not at all.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::models::{NewUser, UserRecord};
use crate::store::UserStore;
use crate::Result;

/// Rows per INSERT statement (3 bound parameters each, under SQLite's
/// 999-variable limit)
const INSERT_CHUNK_ROWS: usize = 300;

/// Ids per DELETE statement
const DELETE_CHUNK_IDS: usize = 900;

/// Load all users ordered by id
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserRecord>> {
    let users = sqlx::query_as::<_, UserRecord>(
        "SELECT id, name, age, birth FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Insert all users in one transaction, returning the number inserted
pub async fn insert_users(pool: &SqlitePool, users: &[NewUser]) -> Result<u64> {
    if users.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for chunk in users.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO users (name, age, birth) ");
        builder.push_values(chunk, |mut row, user| {
            row.push_bind(user.name.clone())
                .push_bind(user.age)
                .push_bind(user.birth.clone());
        });

        inserted += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    debug!("Inserted {} users", inserted);

    Ok(inserted)
}

/// Delete users by id in one transaction, returning rows actually removed
///
/// Ids without a matching row are ignored.
pub async fn delete_users(pool: &SqlitePool, ids: &[i64]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut deleted = 0;

    for chunk in ids.chunks(DELETE_CHUNK_IDS) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM users WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        deleted += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    debug!("Deleted {} of {} requested users", deleted, ids.len());

    Ok(deleted)
}

/// [`UserStore`] backed directly by the SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn select(&self) -> Result<Vec<UserRecord>> {
        list_users(&self.pool).await
    }

    async fn insert(&self, users: &[NewUser]) -> Result<u64> {
        insert_users(&self.pool, users).await
    }

    async fn delete(&self, ids: &[i64]) -> Result<u64> {
        delete_users(&self.pool, ids).await
    }
}
