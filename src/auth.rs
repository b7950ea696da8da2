pub mod controller;
pub mod lock;
pub mod model;
pub mod repository;
pub mod service;
pub mod sheet;

use std::sync::Arc;

use crate::config::Config;
use controller::AuthController;
use lock::StoreLock;
use repository::AuthRepository;
use service::AuthService;
use sheet::Sheet;

/// Wires repository, lock and service for the given sheet.
pub fn build_controller<S: Sheet>(sheet: S, config: &Config) -> Arc<AuthController<S>> {
    let service = AuthService::new(
        AuthRepository::new(sheet),
        StoreLock::new(config.lock_timeout),
        config.lock_timeout_policy,
    );
    Arc::new(AuthController::new(service))
}
