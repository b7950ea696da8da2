use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the record sheet. Passwords are kept in plaintext.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.password.clone(),
            self.created_at.to_rfc3339(),
        ]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AuthRequest {
    Login { username: String, password: String },
    Register { username: String, password: String },
}

impl AuthRequest {
    pub fn action(&self) -> &'static str {
        match self {
            AuthRequest::Login { .. } => "login",
            AuthRequest::Register { .. } => "register",
        }
    }

    pub fn username(&self) -> &str {
        match self {
            AuthRequest::Login { username, .. } | AuthRequest::Register { username, .. } => {
                username
            }
        }
    }

    pub fn password(&self) -> &str {
        match self {
            AuthRequest::Login { password, .. } | AuthRequest::Register { password, .. } => {
                password
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Presence check only; no other sanitization is applied.
pub fn has_credentials(username: &str, password: &str) -> bool {
    !username.is_empty() && !password.is_empty()
}
