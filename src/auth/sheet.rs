use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{constants::SHEET_HEADER, db::Dialect, error::CustomError};

/// A flat two-dimensional table. Row 0 is the header row.
#[async_trait]
pub trait Sheet: Send + Sync {
    /// Every row in insertion order, header included.
    async fn values(&self) -> Result<Vec<Vec<String>>, CustomError>;
    async fn append_row(&self, row: Vec<String>) -> Result<(), CustomError>;
}

pub struct SqlSheet {
    pool: sqlx::AnyPool,
    table: String,
}

impl SqlSheet {
    /// `table` must already be a validated identifier.
    pub fn new(pool: sqlx::AnyPool, table: &str) -> Self {
        SqlSheet {
            pool,
            table: table.to_string(),
        }
    }

    /// Creates the table when missing and writes the header row into an empty one.
    pub async fn ensure_schema(&self, dialect: Dialect) -> Result<(), CustomError> {
        let row_index = match dialect {
            Dialect::Postgres => "BIGSERIAL PRIMARY KEY",
            Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        };
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                row_index {},
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            self.table, row_index
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(CustomError::DBError)?;

        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", self.table))
            .fetch_one(&self.pool)
            .await
            .map_err(CustomError::DBError)?;
        if count == 0 {
            self.append_row(SHEET_HEADER.iter().map(|s| s.to_string()).collect())
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Sheet for SqlSheet {
    async fn values(&self) -> Result<Vec<Vec<String>>, CustomError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(&format!(
            "SELECT username, password, created_at FROM {} ORDER BY row_index",
            self.table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(CustomError::DBError)?;

        Ok(rows
            .into_iter()
            .map(|(username, password, created_at)| vec![username, password, created_at])
            .collect())
    }

    async fn append_row(&self, row: Vec<String>) -> Result<(), CustomError> {
        let mut cells = row.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        let (username, password, created_at) = (next(), next(), next());

        sqlx::query(&format!(
            "INSERT INTO {} (username, password, created_at) VALUES ($1, $2, $3)",
            self.table
        ))
        .bind(username)
        .bind(password)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(CustomError::DBError)?;
        Ok(())
    }
}

#[async_trait]
impl<T: Sheet + ?Sized> Sheet for Arc<T> {
    async fn values(&self) -> Result<Vec<Vec<String>>, CustomError> {
        (**self).values().await
    }

    async fn append_row(&self, row: Vec<String>) -> Result<(), CustomError> {
        (**self).append_row(row).await
    }
}

/// Process-local sheet, seeded with the header row.
pub struct MemorySheet {
    rows: RwLock<Vec<Vec<String>>>,
}

impl MemorySheet {
    pub fn new() -> Self {
        MemorySheet {
            rows: RwLock::new(vec![SHEET_HEADER.iter().map(|s| s.to_string()).collect()]),
        }
    }
}

impl Default for MemorySheet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sheet for MemorySheet {
    async fn values(&self) -> Result<Vec<Vec<String>>, CustomError> {
        Ok(self.rows.read().await.clone())
    }

    async fn append_row(&self, row: Vec<String>) -> Result<(), CustomError> {
        self.rows.write().await.push(row);
        Ok(())
    }
}
