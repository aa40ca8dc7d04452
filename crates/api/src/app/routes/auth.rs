//! Public authentication endpoints, mounted outside the token gate.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::middleware;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/me", get(me))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.login(&body.username, &body.password) {
        // One generic reason for unknown user and wrong password alike.
        Ok(None) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "invalid username or password",
        ),
        Ok(Some((token, user))) => Json(dto::LoginResponse {
            token,
            user: dto::UserSummary::from(&user),
        })
        .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    match services.register(&body.username, &body.password) {
        Ok(user) => (StatusCode::CREATED, Json(dto::UserSummary::from(&user))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Resolve the bearer token into the account it names. Lives on the public
/// router, so it parses the header itself instead of relying on the gate.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let Some(token) = middleware::extract_bearer(&headers) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized");
    };
    let claims = match services.codec.verify(token) {
        Ok(claims) => claims,
        Err(_) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid token")
        }
    };
    match services.get_user_by_username(&claims.sub) {
        Ok(user) => Json(dto::UserSummary::from(&user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
