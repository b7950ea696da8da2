use std::{error::Error, fmt::Debug};

#[derive(thiserror::Error)]
pub enum CustomError {
    #[error("ENV '{0}' Not Found")]
    EnvError(String, #[source] std::env::VarError),

    #[error("Invalid config '{0}': {1}")]
    InvalidConfig(String, String),

    #[error("Database query")]
    DBError(#[source] sqlx::Error),

    #[error("Invalid request body: {0}")]
    BodyError(String),

    #[error("Invalid JSON payload")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid endpoint url: {0}")]
    InvalidUrl(String),

    #[error("Request failed")]
    TransportError(#[source] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    StatusError(u16),

    #[error("Failed to decode response")]
    DecodeError(#[source] reqwest::Error),
}

impl Debug for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        if let Some(source) = self.source() {
            write!(f, " (Caused by: {})", source)?;
        }
        Ok(())
    }
}
