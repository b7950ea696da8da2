use sqlx::Pool;

use crate::error::CustomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> Result<Self, CustomError> {
        if url.starts_with("postgres:") || url.starts_with("postgresql:") {
            Ok(Dialect::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Dialect::Sqlite)
        } else {
            Err(CustomError::InvalidConfig(
                "DATABASE_URL".to_string(),
                "expected a postgres:// or sqlite: url".to_string(),
            ))
        }
    }
}

pub struct Database {
    pub pool: Pool<sqlx::Any>,
    pub dialect: Dialect,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self, CustomError> {
        let dialect = Dialect::from_url(url)?;
        sqlx::any::install_default_drivers();
        let pool = sqlx::any::AnyPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .idle_timeout(std::time::Duration::from_secs(30))
            .connect(url)
            .await
            .map_err(CustomError::DBError)?;
        Ok(Database { pool, dialect })
    }
}
