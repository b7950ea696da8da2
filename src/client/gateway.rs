//! Client side of the auth exchange.
//!
//! Every call is a single POST attempt. Whatever goes wrong on the way
//! (connect failure, non-2xx status, body that is not an auth response)
//! is logged and folded into a generic failed [`AuthResponse`].

use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{debug, error};

use crate::{
    auth::model::{AuthRequest, AuthResponse, has_credentials},
    constants::{CONNECTION_FAILED, MISSING_CREDENTIALS, REQUEST_CONTENT_TYPE},
    error::CustomError,
    utils::ser_to_str,
};

/// Seam between the session state and the transport.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> AuthResponse;
    async fn register(&self, username: &str, password: &str) -> AuthResponse;
}

pub struct AuthGateway {
    http: Client,
    endpoint: String,
}

impl AuthGateway {
    pub fn new(endpoint: &str) -> Result<Self, CustomError> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(CustomError::InvalidUrl(format!(
                "'{}' must start with http:// or https://",
                endpoint
            )));
        }

        // No timeout or retry policy: the transport defaults apply.
        let http = Client::builder()
            .user_agent(format!("sheet-auth/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CustomError::TransportError)?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send(&self, request: &AuthRequest) -> AuthResponse {
        if !has_credentials(request.username(), request.password()) {
            return AuthResponse::fail(MISSING_CREDENTIALS);
        }

        match self.try_send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(action = request.action(), endpoint = %self.endpoint, "API Error: {:?}", e);
                AuthResponse::fail(CONNECTION_FAILED)
            }
        }
    }

    async fn try_send(&self, request: &AuthRequest) -> Result<AuthResponse, CustomError> {
        debug!(action = request.action(), endpoint = %self.endpoint, "calling auth endpoint");

        let body = ser_to_str(request)?;
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, REQUEST_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(CustomError::TransportError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CustomError::StatusError(status.as_u16()));
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(CustomError::DecodeError)
    }

    /// Issues the GET health check and returns the plain-text body.
    pub async fn ping(&self) -> Result<String, CustomError> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(CustomError::TransportError)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CustomError::StatusError(status.as_u16()));
        }
        response.text().await.map_err(CustomError::DecodeError)
    }
}

#[async_trait]
impl Authenticator for AuthGateway {
    async fn login(&self, username: &str, password: &str) -> AuthResponse {
        self.send(&AuthRequest::Login {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await
    }

    async fn register(&self, username: &str, password: &str) -> AuthResponse {
        self.send(&AuthRequest::Register {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_endpoint_without_scheme() {
        assert!(matches!(
            AuthGateway::new("script.example.com/exec"),
            Err(CustomError::InvalidUrl(_))
        ));
        assert!(AuthGateway::new("https://script.example.com/exec").is_ok());
    }

    #[tokio::test]
    async fn blank_fields_never_leave_the_client() {
        // nothing listens here; a forwarded request would come back as a connection failure
        let gateway = AuthGateway::new("http://127.0.0.1:9/exec").unwrap();
        assert_eq!(
            gateway.login("", "pw").await,
            AuthResponse::fail(MISSING_CREDENTIALS)
        );
        assert_eq!(
            gateway.register("alice", "").await,
            AuthResponse::fail(MISSING_CREDENTIALS)
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_failed_response() {
        let gateway = AuthGateway::new("http://127.0.0.1:9/exec").unwrap();
        assert_eq!(
            gateway.login("alice", "pw").await,
            AuthResponse::fail(CONNECTION_FAILED)
        );
    }
}
