use serde_json::Value;
use tracing::debug;

use super::{
    model::{AuthRequest, AuthResponse},
    service::{AuthService, server_error},
    sheet::Sheet,
};
use crate::{
    constants::{INVALID_OPERATION, LIVENESS_MESSAGE, OK_JSON, OK_TEXT},
    error::CustomError,
    utils::{des_from_str, ser_to_str},
};

const FALLBACK_BODY: &str = r#"{"success":false,"message":"server error"}"#;

pub struct AuthController<S: Sheet> {
    service: AuthService<S>,
}

impl<S: Sheet> AuthController<S> {
    pub fn new(service: AuthService<S>) -> Self {
        AuthController { service }
    }

    pub fn service(&self) -> &AuthService<S> {
        &self.service
    }

    /// Every outcome, failures included, is a 200 with a JSON body.
    pub async fn dispatch(&self, body: &str) -> (String, String) {
        let response = match parse_request(body) {
            Ok(Some(request)) => {
                debug!(action = request.action(), username = request.username(), "dispatch");
                self.service.handle(&request).await
            }
            Ok(None) => AuthResponse::fail(INVALID_OPERATION),
            Err(error) => {
                tracing::error!("Error parsing request: {:?}", error);
                server_error(&error)
            }
        };

        json_response(&response)
    }

    /// A POST whose body could not be read still gets the JSON envelope.
    pub fn reject_body(&self, error: &CustomError) -> (String, String) {
        tracing::error!("Error reading request body: {:?}", error);
        json_response(&server_error(error))
    }

    pub fn liveness(&self) -> (String, String) {
        (OK_TEXT.to_string(), LIVENESS_MESSAGE.to_string())
    }
}

fn json_response(response: &AuthResponse) -> (String, String) {
    let json = ser_to_str(response).unwrap_or_else(|_| FALLBACK_BODY.to_string());
    (OK_JSON.to_string(), json)
}

/// `Ok(None)` when `action` is missing or not one we know.
pub fn parse_request(body: &str) -> Result<Option<AuthRequest>, CustomError> {
    let value: Value = des_from_str(body)?;
    match value.get("action").and_then(Value::as_str) {
        Some("login") | Some("register") => Ok(Some(serde_json::from_value(value)?)),
        _ => Ok(None),
    }
}
