//! Ledger API routes, mounted under /api/v1 by `app`.

use crate::config::LedgerConfig;
use crate::handlers::{accounts, auth, credentials, customers, transactions, views};
use crate::routes::status_routes;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub fn ledger_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/me", get(views::me))
        .route("/admin/view", get(views::admin_view))
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/:id",
            get(customers::read).put(customers::update).delete(customers::delete),
        )
        .route("/customers/:id/view", get(views::customer_view))
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/accounts/:id",
            get(accounts::read).put(accounts::update).delete(accounts::delete),
        )
        .route("/accounts/:id/reconcile", get(accounts::reconcile))
        .route("/transactions", get(transactions::list).post(transactions::post))
        .route("/credentials", get(credentials::list).post(credentials::create))
        .route("/credentials/:username", axum::routing::delete(credentials::delete))
        .with_state(state)
}

/// Full application: status routes at the root, ledger routes under /api/v1.
pub fn app(state: AppState, config: &LedgerConfig) -> Router {
    Router::new()
        .merge(status_routes(state.clone()))
        .nest("/api/v1", ledger_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(config.body_limit_bytes)),
        )
}
