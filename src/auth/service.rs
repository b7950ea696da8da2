use tracing::{info, warn};

use super::{
    lock::{LockTimeoutPolicy, StoreLock},
    model::{Account, AuthRequest, AuthResponse},
    repository::AuthRepository,
    sheet::Sheet,
};
use crate::{
    constants::{
        ACCOUNT_EXISTS, INVALID_CREDENTIALS, LOGIN_SUCCESS, REGISTER_SUCCESS, SERVER_ERROR_PREFIX,
        STORE_BUSY,
    },
    error::CustomError,
};

/// Sole writer of the account sheet.
pub struct AuthService<S: Sheet> {
    repository: AuthRepository<S>,
    lock: StoreLock,
    lock_timeout_policy: LockTimeoutPolicy,
}

impl<S: Sheet> AuthService<S> {
    pub fn new(
        repository: AuthRepository<S>,
        lock: StoreLock,
        lock_timeout_policy: LockTimeoutPolicy,
    ) -> Self {
        AuthService {
            repository,
            lock,
            lock_timeout_policy,
        }
    }

    pub fn repository(&self) -> &AuthRepository<S> {
        &self.repository
    }

    pub fn lock(&self) -> &StoreLock {
        &self.lock
    }

    pub async fn handle(&self, request: &AuthRequest) -> AuthResponse {
        match request {
            AuthRequest::Login { username, password } => self.login(username, password).await,
            AuthRequest::Register { username, password } => {
                self.register(username, password).await
            }
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> AuthResponse {
        let guard = self.lock.acquire().await;
        if guard.is_none() {
            match self.lock_timeout_policy {
                LockTimeoutPolicy::ProceedUnlocked => {
                    warn!(
                        username,
                        timeout_ms = self.lock.timeout().as_millis() as u64,
                        "store lock not acquired, registering without it"
                    );
                }
                LockTimeoutPolicy::Reject => {
                    warn!(username, "store lock not acquired, rejecting register");
                    return AuthResponse::fail(STORE_BUSY);
                }
            }
        }

        let response = self.try_register(username, password).await;
        drop(guard);
        server_error_on_failure(response)
    }

    async fn try_register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, CustomError> {
        if self.repository.username_exists(username).await? {
            info!(username, "register rejected, username taken");
            return Ok(AuthResponse::fail(ACCOUNT_EXISTS));
        }

        self.repository
            .insert_account(&Account::new(username, password))
            .await?;
        info!(username, "account registered");
        Ok(AuthResponse::ok(REGISTER_SUCCESS))
    }

    /// Lock-free read; may observe a register that is still in progress.
    pub async fn login(&self, username: &str, password: &str) -> AuthResponse {
        server_error_on_failure(self.try_login(username, password).await)
    }

    async fn try_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, CustomError> {
        match self.repository.find_by_credentials(username, password).await? {
            Some(found) => {
                info!(
                    username,
                    row = found.row_index,
                    created_at = %found.created_at,
                    "login succeeded"
                );
                Ok(AuthResponse::ok(LOGIN_SUCCESS))
            }
            None => {
                info!(username, "login failed");
                Ok(AuthResponse::fail(INVALID_CREDENTIALS))
            }
        }
    }
}

/// Backend failures become a normal response carrying the error text.
pub fn server_error_on_failure(result: Result<AuthResponse, CustomError>) -> AuthResponse {
    result.unwrap_or_else(|error| {
        tracing::error!("Error sheet operation: {:?}", error);
        server_error(&error)
    })
}

pub fn server_error(error: &CustomError) -> AuthResponse {
    AuthResponse::fail(format!("{SERVER_ERROR_PREFIX}{error:?}"))
}
