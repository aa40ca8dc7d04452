//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: business orchestration over the stores (policy check →
//!   lifecycle guard → write, per operation)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response shapes that differ from the domain types
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use chrono::Duration;

use orderdesk_auth::{Role, TokenCodec, User};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Everything `build_app` needs; read from the environment in `main`.
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Seed OWNER account, created at startup when the store is empty.
    pub bootstrap_owner: Option<(String, String)>,
}

impl AppConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::hours(12),
            bootstrap_owner: None,
        }
    }

    pub fn with_owner(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.bootstrap_owner = Some((username.into(), password.into()));
        self
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: AppConfig) -> Router {
    let codec = Arc::new(TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl));
    let services = Arc::new(services::AppServices::new(Arc::clone(&codec)));

    if let Some((username, password)) = config.bootstrap_owner {
        match User::with_role(username, password, Role::Owner, chrono::Utc::now())
            .and_then(|owner| services.stores.users.insert(owner))
        {
            Ok(owner) => tracing::info!(username = %owner.username, "bootstrapped owner account"),
            Err(e) => tracing::warn!(error = %e, "owner bootstrap skipped"),
        }
    }

    let auth_state = middleware::AuthState { codec };

    // Everything under /api except /api/auth/* requires a verified token.
    let protected = routes::router()
        .layer(Extension(Arc::clone(&services)))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/auth", routes::auth::router().layer(Extension(services)))
        .nest("/api", protected)
}
