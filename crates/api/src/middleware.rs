//! Authentication gate for all protected routes.
//!
//! Runs before any business handler and is the sole writer of the request's
//! [`AuthContext`]. Clients always see an undifferentiated 401; the concrete
//! token failure is only logged.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use orderdesk_auth::TokenCodec;

use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    // CORS pre-flight carries no credentials.
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let Some(token) = extract_bearer(req.headers()) else {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    };

    match state.codec.verify(token) {
        Ok(claims) => {
            req.extensions_mut()
                .insert(AuthContext::new(claims.uid, claims.sub, claims.role));
            next.run(req).await
        }
        Err(cause) => {
            tracing::debug!(%cause, "rejected bearer token");
            (StatusCode::UNAUTHORIZED, "invalid token").into_response()
        }
    }
}

pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
