//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `Store` port from the `core` crate backed by a PostgreSQL collection
//! of records, using `sqlx`.

use async_trait::async_trait;
use reflections_core::domain::{ReflectionEntry, Subscriber};
use reflections_core::ports::{PortError, PortResult, Store};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `Store` port.
#[derive(Clone)]
pub struct DbStore {
    pool: PgPool,
}

impl DbStore {
    /// Creates a new `DbStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn storage_error(e: sqlx::Error) -> PortError {
    PortError::Storage(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct ReflectionRecord {
    id: String,
    title: String,
    body: String,
    entry_date: String,
}

impl ReflectionRecord {
    fn to_domain(self) -> ReflectionEntry {
        ReflectionEntry {
            id: self.id,
            title: self.title,
            body: self.body,
            date: self.entry_date,
        }
    }
}

#[derive(FromRow)]
struct SubscriberRecord {
    email: String,
    subscribed_on: String,
    selected: bool,
}

impl SubscriberRecord {
    fn to_domain(self) -> Subscriber {
        Subscriber {
            email: self.email,
            date: self.subscribed_on,
            selected: self.selected,
        }
    }
}

//=========================================================================================
// `Store` Trait Implementation
//=========================================================================================

#[async_trait]
impl Store for DbStore {
    async fn insert_reflection(&self, entry: ReflectionEntry) -> PortResult<ReflectionEntry> {
        sqlx::query(
            "INSERT INTO reflections (id, title, body, entry_date) VALUES ($1, $2, $3, $4)",
        )
        .bind(&entry.id)
        .bind(&entry.title)
        .bind(&entry.body)
        .bind(&entry.date)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(entry)
    }

    async fn find_reflection(&self, id: &str) -> PortResult<Option<ReflectionEntry>> {
        let record = sqlx::query_as::<_, ReflectionRecord>(
            "SELECT id, title, body, entry_date FROM reflections WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(record.map(ReflectionRecord::to_domain))
    }

    async fn list_reflections(&self) -> PortResult<Vec<ReflectionEntry>> {
        let records = sqlx::query_as::<_, ReflectionRecord>(
            "SELECT id, title, body, entry_date FROM reflections ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(records.into_iter().map(ReflectionRecord::to_domain).collect())
    }

    async fn replace_reflection(
        &self,
        id: &str,
        entry: ReflectionEntry,
    ) -> PortResult<ReflectionEntry> {
        let result = sqlx::query(
            "UPDATE reflections SET title = $1, body = $2, entry_date = $3 WHERE id = $4",
        )
        .bind(&entry.title)
        .bind(&entry.body)
        .bind(&entry.date)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Reflection {id} not found")));
        }
        Ok(entry)
    }

    async fn delete_reflection(&self, id: &str) -> PortResult<bool> {
        let result = sqlx::query("DELETE FROM reflections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_subscriber(&self, subscriber: Subscriber) -> PortResult<Subscriber> {
        sqlx::query(
            "INSERT INTO subscribers (email, subscribed_on, selected) VALUES ($1, $2, $3)",
        )
        .bind(&subscriber.email)
        .bind(&subscriber.date)
        .bind(subscriber.selected)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                PortError::Duplicate(subscriber.email.clone())
            }
            _ => storage_error(e),
        })?;

        Ok(subscriber)
    }

    async fn find_subscriber(&self, email: &str) -> PortResult<Option<Subscriber>> {
        let record = sqlx::query_as::<_, SubscriberRecord>(
            "SELECT email, subscribed_on, selected FROM subscribers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(record.map(SubscriberRecord::to_domain))
    }

    async fn list_subscribers(&self) -> PortResult<Vec<Subscriber>> {
        let records = sqlx::query_as::<_, SubscriberRecord>(
            "SELECT email, subscribed_on, selected FROM subscribers ORDER BY email ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(records.into_iter().map(SubscriberRecord::to_domain).collect())
    }

    async fn set_subscriber_selection(
        &self,
        emails: &[String],
        selected: bool,
    ) -> PortResult<u64> {
        let result = sqlx::query("UPDATE subscribers SET selected = $1 WHERE email = ANY($2)")
            .bind(selected)
            .bind(emails)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_subscriber(&self, email: &str) -> PortResult<bool> {
        let result = sqlx::query("DELETE FROM subscribers WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}
