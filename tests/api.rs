//! HTTP surface: role gating, envelopes and error mapping.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use bank_ledger::extractors::caller::{PASSWORD_HEADER, USERNAME_HEADER};
use bank_ledger::store::{ADMIN_PASSWORD, ADMIN_USERNAME};
use bank_ledger::{app, ensure_tables, seed_admin, AppState, LedgerConfig, Store};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let store = Store::in_memory().await.unwrap();
    ensure_tables(&store).await.unwrap();
    seed_admin(&store).await.unwrap();
    app(AppState::new(store), &LedgerConfig::default())
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    login: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some((user, pass)) = login {
        req = req.header(USERNAME_HEADER, user).header(PASSWORD_HEADER, pass);
    }
    let req = match body {
        Some(v) => req
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

const ADMIN: Option<(&str, &str)> = Some((ADMIN_USERNAME, ADMIN_PASSWORD));

#[tokio::test]
async fn test_health_needs_no_login() {
    let app = test_app().await;
    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, body) = call(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
    let (status, body) = call(&app, Method::GET, "/version", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "bank-ledger");
    assert!(body.get("database").is_none());
}

#[tokio::test]
async fn test_login_reports_role() {
    let app = test_app().await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "admin", "password": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "admin");
    assert_eq!(body["data"]["customer_id"], Value::Null);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"username": "admin", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "invalid_credentials");
}

#[tokio::test]
async fn test_admin_routes_reject_missing_and_customer_logins() {
    let app = test_app().await;
    let (status, _) = call(&app, Method::GET, "/api/v1/customers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/customers",
        ADMIN,
        Some(json!({"name": "Pedro Kim"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/credentials",
        ADMIN,
        Some(json!({"username": "pedro", "password": "pw", "role": "customer", "customer_id": customer_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let pedro = Some(("pedro", "pw"));
    let (status, body) = call(&app, Method::GET, "/api/v1/customers", pedro, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");
    let (status, _) = call(&app, Method::GET, "/api/v1/admin/view", pedro, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/api/v1/me", pedro, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["customer"]["id"], customer_id);

    let (status, _) = call(&app, Method::GET, "/api/v1/me", ADMIN, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_posting_over_http() {
    let app = test_app().await;
    let (_, body) = call(
        &app,
        Method::POST,
        "/api/v1/customers",
        ADMIN,
        Some(json!({"name": "Ana Lee", "email": "ana@example.com"})),
    )
    .await;
    let customer_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/accounts",
        ADMIN,
        Some(json!({"customer_id": customer_id, "account_type": "Savings", "initial_balance": "1000.00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["balance"], "1000.00");
    let account_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/transactions",
        ADMIN,
        Some(json!({"account_id": account_id, "type": "deposit", "amount": "250.00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["new_balance"], "1250.00");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/transactions",
        ADMIN,
        Some(json!({"account_id": account_id, "type": "withdraw", "amount": "2000.00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "insufficient_funds");
    assert_eq!(body["error"]["details"]["balance"], "1250.00");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/transactions",
        ADMIN,
        Some(json!({"account_id": account_id, "type": "deposit", "amount": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, body) = call(&app, Method::GET, "/api/v1/transactions", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);

    let uri = format!("/api/v1/accounts/{}/reconcile", account_id);
    let (status, body) = call(&app, Method::GET, &uri, ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["consistent"], true);
}

#[tokio::test]
async fn test_missing_and_malformed_ids() {
    let app = test_app().await;
    let (status, body) = call(&app, Method::GET, "/api/v1/accounts/99", ADMIN, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = call(&app, Method::GET, "/api/v1/customers/abc", ADMIN, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::DELETE, "/api/v1/customers/5", ADMIN, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
