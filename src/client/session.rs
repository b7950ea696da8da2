use tracing::debug;

use super::gateway::Authenticator;
use crate::{
    auth::model::{AuthResponse, has_credentials},
    constants::MISSING_CREDENTIALS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn success(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Clears the loading flag however `submit` ends, cancellation included.
struct LoadingGuard<'a>(&'a mut bool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Form state of the login/register client.
pub struct AuthSession<A: Authenticator> {
    gateway: A,
    mode: AuthMode,
    username: String,
    password: String,
    loading: bool,
    notice: Option<Notice>,
    logged_in: bool,
}

impl<A: Authenticator> AuthSession<A> {
    pub fn new(gateway: A) -> Self {
        AuthSession {
            gateway,
            mode: AuthMode::Login,
            username: String::new(),
            password: String::new(),
            loading: false,
            notice: None,
            logged_in: false,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn set_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.notice = None;
    }

    pub fn set_credentials(&mut self, username: &str, password: &str) {
        self.username = username.to_string();
        self.password = password.to_string();
    }

    /// Returns the backend response, or `None` if nothing was sent.
    ///
    /// `&mut self` already rules out a second submit in flight; `is_loading`
    /// only reports the one in progress.
    pub async fn submit(&mut self) -> Option<AuthResponse> {
        if !has_credentials(&self.username, &self.password) {
            self.notice = Some(Notice::error(MISSING_CREDENTIALS));
            return None;
        }

        self.loading = true;
        let _loading = LoadingGuard(&mut self.loading);
        self.notice = None;
        debug!(mode = ?self.mode, username = %self.username, "submitting");

        let response = match self.mode {
            AuthMode::Login => self.gateway.login(&self.username, &self.password).await,
            AuthMode::Register => self.gateway.register(&self.username, &self.password).await,
        };

        if response.success {
            self.notice = Some(Notice::success(response.message.clone()));
            match self.mode {
                AuthMode::Login => self.logged_in = true,
                AuthMode::Register => {
                    self.mode = AuthMode::Login;
                    self.password.clear();
                }
            }
        } else {
            self.notice = Some(Notice::error(response.message.clone()));
        }

        Some(response)
    }

    /// Client-only reset; the backend is not contacted.
    pub fn logout(&mut self) {
        self.logged_in = false;
        self.username.clear();
        self.password.clear();
        self.notice = None;
    }
}
