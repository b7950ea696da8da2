use common::{setup_test_sheet, test_config};
use sheet_auth::{
    auth::{
        build_controller,
        controller::AuthController,
        model::AuthResponse,
        sheet::{Sheet, SqlSheet},
    },
    client::gateway::{AuthGateway, Authenticator},
    client::session::{AuthMode, AuthSession},
    constants::{
        INVALID_OPERATION, LIVENESS_MESSAGE, OK_JSON, REGISTER_SUCCESS, SERVER_ERROR_PREFIX,
    },
    db::Dialect,
    server::Server,
    utils::des_from_str,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::oneshot;
mod common;

async fn dispatch_json(controller: &AuthController<SqlSheet>, body: &str) -> AuthResponse {
    let (status_line, content) = controller.dispatch(body).await;
    assert_eq!(status_line, OK_JSON.to_string());
    des_from_str(&content).expect("response is an auth response")
}

fn body(action: &str, username: &str, password: &str) -> String {
    serde_json::json!({"action": action, "username": username, "password": password}).to_string()
}

#[tokio::test]
async fn register_then_duplicate_register() {
    let controller = build_controller(setup_test_sheet().await, &test_config());

    let first = dispatch_json(&controller, &body("register", "alice", "hunter2")).await;
    assert!(first.success);
    assert_eq!(first.message, REGISTER_SUCCESS);

    let second = dispatch_json(&controller, &body("register", "alice", "other")).await;
    assert!(!second.success);
    assert!(second.message.contains("exists"));

    let rows = controller.service().repository().sheet().values().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["username", "password", "created_at"]);
    assert_eq!(rows[1][0], "alice");
    assert_eq!(rows[1][1], "hunter2");
}

#[tokio::test]
async fn login_without_record_is_invalid() {
    let controller = build_controller(setup_test_sheet().await, &test_config());

    let response = dispatch_json(&controller, &body("login", "bob", "x")).await;
    assert!(!response.success);
    assert!(response.message.contains("invalid"));
}

#[tokio::test]
async fn login_checks_both_fields() {
    let controller = build_controller(setup_test_sheet().await, &test_config());
    assert!(dispatch_json(&controller, &body("register", "carol", "pw1")).await.success);

    let wrong = dispatch_json(&controller, &body("login", "carol", "wrong")).await;
    let unknown = dispatch_json(&controller, &body("login", "nobody", "pw1")).await;
    assert!(!wrong.success);
    assert_eq!(wrong, unknown);

    let right = dispatch_json(&controller, &body("login", "carol", "pw1")).await;
    assert!(right.success);
}

#[tokio::test]
async fn unknown_action_and_bad_json() {
    let controller = build_controller(setup_test_sheet().await, &test_config());

    let unknown = dispatch_json(&controller, &body("delete", "a", "b")).await;
    assert_eq!(unknown, AuthResponse::fail(INVALID_OPERATION));

    let broken = dispatch_json(&controller, "{\"action\": \"login\"").await;
    assert!(!broken.success);
    assert!(broken.message.starts_with(SERVER_ERROR_PREFIX));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registers_keep_usernames_unique() {
    let controller = build_controller(setup_test_sheet().await, &test_config());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                let request = body("register", "dave", &format!("pw{}", i));
                controller.dispatch(&request).await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        let (_, content) = handle.await.unwrap();
        let response: AuthResponse = des_from_str(&content).unwrap();
        if response.success {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let rows = controller.service().repository().sheet().values().await.unwrap();
    assert_eq!(rows.iter().filter(|row| row[0] == "dave").count(), 1);
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let sheet = setup_test_sheet().await;
    sheet.ensure_schema(Dialect::Sqlite).await.unwrap();
    assert_eq!(sheet.values().await.unwrap().len(), 1);
}

async fn spawn_server() -> (
    SocketAddr,
    oneshot::Sender<()>,
    Arc<AuthController<SqlSheet>>,
) {
    let config = test_config();
    let controller = build_controller(setup_test_sheet().await, &config);
    let server = Server::bind(config.bind_addr, &config.endpoint_path, Arc::clone(&controller))
        .await
        .expect("bind test server");
    let addr = server.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(server.start(shutdown_rx));
    (addr, shutdown_tx, controller)
}

#[tokio::test]
async fn gateway_round_trip_through_server() {
    let (addr, shutdown_tx, _) = spawn_server().await;
    let gateway = AuthGateway::new(&format!("http://{}/exec", addr)).unwrap();

    assert!(gateway.register("erin", "pw").await.success);
    assert!(!gateway.register("erin", "pw2").await.success);
    assert!(gateway.login("erin", "pw").await.success);
    assert!(!gateway.login("erin", "pw2").await.success);

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn liveness_does_not_touch_the_sheet() {
    let (addr, shutdown_tx, controller) = spawn_server().await;
    let gateway = AuthGateway::new(&format!("http://{}/exec", addr)).unwrap();

    assert_eq!(gateway.ping().await.unwrap(), LIVENESS_MESSAGE);
    assert_eq!(
        controller.service().repository().sheet().values().await.unwrap().len(),
        1
    );

    let _ = shutdown_tx.send(());
}

#[tokio::test]
async fn session_register_then_login() {
    let (addr, shutdown_tx, _) = spawn_server().await;
    let gateway = AuthGateway::new(&format!("http://{}/exec", addr)).unwrap();
    let mut session = AuthSession::new(gateway);

    session.set_mode(AuthMode::Register);
    session.set_credentials("frank", "pw");
    assert!(session.submit().await.unwrap().success);
    assert_eq!(session.mode(), AuthMode::Login);

    session.set_credentials("frank", "pw");
    assert!(session.submit().await.unwrap().success);
    assert!(session.is_logged_in());

    session.logout();
    assert!(!session.is_logged_in());

    let _ = shutdown_tx.send(());
}
