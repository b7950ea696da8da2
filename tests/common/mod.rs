use rand::Rng;
use sheet_auth::{auth::sheet::SqlSheet, config::Config, db::Dialect};
use sqlx::any::{AnyPoolOptions, install_default_drivers};

pub async fn setup_test_sheet() -> SqlSheet {
    install_default_drivers();
    let suffix: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();
    let db_name = format!("test_{}", suffix);
    let database_url = format!("sqlite:file:{}?mode=memory&cache=shared", db_name);

    // A single connection keeps the in-memory database alive for the whole test
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to create in-memory SQLite DB");

    let sheet = SqlSheet::new(pool, "accounts");
    sheet
        .ensure_schema(Dialect::Sqlite)
        .await
        .expect("Failed to create test sheet");
    sheet
}

pub fn test_config() -> Config {
    let mut config = Config::from_lookup(|_| Err(std::env::VarError::NotPresent))
        .expect("default config");
    config.bind_addr = "127.0.0.1:0".parse().unwrap();
    config
}
