use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use orderdesk_core::SellId;
use orderdesk_sells::{SellDraft, SellFilter};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_sell).get(list_sells))
        .route("/:id", get(get_sell).put(update_sell).delete(delete_sell))
        .route("/:id/approve", post(approve_sell))
        .route("/:id/reject", post(reject_sell))
        .route("/:id/payment", put(set_payment))
}

fn parse_id(raw: &str) -> Result<SellId, axum::response::Response> {
    raw.parse().map_err(errors::domain_error_to_response)
}

pub async fn create_sell(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<SellDraft>,
) -> axum::response::Response {
    match services.create_sell(&ctx, body) {
        Ok(sell) => (StatusCode::CREATED, Json(sell)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_sells(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<SellFilter>,
) -> axum::response::Response {
    match services.list_sells(&ctx, &filter) {
        Ok(sells) => Json(sells).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_sell(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.get_sell(id) {
        Ok(sell) => Json(sell).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_sell(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<SellDraft>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_sell(&ctx, id, body) {
        Ok(sell) => Json(sell).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_sell(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_sell(&ctx, id) {
        Ok(()) => Json(dto::deleted("sell order")).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn approve_sell(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.approve_sell(&ctx, id) {
        Ok(sell) => Json(sell).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn reject_sell(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.reject_sell(&ctx, id) {
        Ok(sell) => Json(sell).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn set_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Query(query): Query<dto::PaymentQuery>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.set_sell_paid(&ctx, id, query.is_paid) {
        Ok(sell) => Json(sell).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
