//! UploadStore — persistence for upload records, backed by SQLite.
//!
//! The store holds a flat collection: no soft-delete, no versioning, no
//! relations between records. Partial updates apply only fields that survive
//! blank-field stripping.

use crate::models::upload::{UploadChanges, UploadRecord};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("upload `{0}` not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD interface over the `uploads` table.
///
/// Every method is a single statement (or lookup plus statement); there are
/// no transactions because no operation touches more than one row.
#[derive(Clone)]
pub struct UploadStore {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl UploadStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Persist a new record with a fresh identifier and return it.
    pub async fn create(&self, url: &str, owner: Option<&str>) -> StoreResult<UploadRecord> {
        let now = Utc::now();
        let record = UploadRecord {
            id: Uuid::new_v4(),
            url: url.to_string(),
            owner: owner.map(str::to_string),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO uploads (id, url, owner, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.id)
        .bind(&record.url)
        .bind(record.owner.as_deref())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&*self.db)
        .await?;

        Ok(record)
    }

    /// Fetch every record in insertion order.
    pub async fn find_all(&self) -> StoreResult<Vec<UploadRecord>> {
        let records = sqlx::query_as::<_, UploadRecord>(
            "SELECT id, url, owner, created_at, updated_at FROM uploads ORDER BY rowid ASC",
        )
        .fetch_all(&*self.db)
        .await?;

        Ok(records)
    }

    /// Fetch a single record. Returns `NotFound` when no row matches.
    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<UploadRecord> {
        sqlx::query_as::<_, UploadRecord>(
            "SELECT id, url, owner, created_at, updated_at FROM uploads WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StoreError::NotFound(id),
            other => StoreError::Sqlx(other),
        })
    }

    /// Apply a partial update. Blank fields are stripped first; when nothing
    /// survives, the row is left untouched but a missing id still errors.
    pub async fn update(&self, id: Uuid, changes: UploadChanges) -> StoreResult<()> {
        let changes = changes.stripped();

        let Some(url) = changes.url else {
            self.find_by_id(id).await?;
            return Ok(());
        };

        let result = sqlx::query("UPDATE uploads SET url = ?, updated_at = ? WHERE id = ?")
            .bind(&url)
            .bind(Utc::now())
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    /// Remove a record. Returns `NotFound` when the id is absent.
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM uploads WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> UploadStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let schema = include_str!("../../migrations/0001_init.sql");
        for stmt in schema.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(stmt).execute(&pool).await.unwrap();
        }

        UploadStore::new(Arc::new(pool))
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let store = store().await;
        let created = store
            .create("https://bucket.example/cat.png", Some("alice"))
            .await
            .unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn find_by_id_missing_is_not_found() {
        let store = store().await;
        let id = Uuid::new_v4();
        let err = store.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn find_all_preserves_insertion_order() {
        let store = store().await;
        let mut ids = Vec::new();
        for n in 0..3 {
            let record = store
                .create(&format!("https://bucket.example/{n}.png"), None)
                .await
                .unwrap();
            ids.push(record.id);
        }

        let all = store.find_all().await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), ids);
    }

    #[tokio::test]
    async fn update_overwrites_only_the_url() {
        let store = store().await;
        let created = store
            .create("https://bucket.example/old.png", Some("alice"))
            .await
            .unwrap();

        store
            .update(
                created.id,
                UploadChanges {
                    url: Some("https://bucket.example/new.png".into()),
                },
            )
            .await
            .unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found.url, "https://bucket.example/new.png");
        assert_eq!(found.owner.as_deref(), Some("alice"));
        assert_eq!(found.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_with_blank_url_is_a_noop() {
        let store = store().await;
        let created = store
            .create("https://bucket.example/cat.png", None)
            .await
            .unwrap();

        store
            .update(
                created.id,
                UploadChanges {
                    url: Some("   ".into()),
                },
            )
            .await
            .unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found_even_when_blank() {
        let store = store().await;
        let id = Uuid::new_v4();

        let err = store
            .update(id, UploadChanges { url: None })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = store
            .update(
                id,
                UploadChanges {
                    url: Some("https://bucket.example/cat.png".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_find_is_not_found() {
        let store = store().await;
        let created = store
            .create("https://bucket.example/cat.png", None)
            .await
            .unwrap();

        store.delete(created.id).await.unwrap();

        assert!(matches!(
            store.find_by_id(created.id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.delete(created.id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }
}
