//! Ownership-relation endpoints: OWNER grants and revokes which STAFF
//! account manages which customer or product.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use orderdesk_core::{CustomerId, ProductId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AuthContext;

pub fn customer_router() -> Router {
    Router::new()
        .route("/", post(assign_customer).delete(unassign_customer))
        .route("/bulk", post(assign_customers).delete(unassign_customers))
        .route("/by-user/:username", get(customers_of))
        .route("/by-customer/:id", get(users_of_customer))
        .route("/check/:username/:id", get(check_customer))
}

pub fn product_router() -> Router {
    Router::new()
        .route("/", post(assign_product).delete(unassign_product))
        .route("/bulk", post(assign_products).delete(unassign_products))
        .route("/by-user/:username", get(products_of))
        .route("/by-product/:id", get(users_of_product))
        .route("/check/:username/:id", get(check_product))
}

pub async fn assign_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::CustomerRelationRequest>,
) -> axum::response::Response {
    match services.assign_customer(&ctx, &body.username, body.customer_id) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn unassign_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::CustomerRelationRequest>,
) -> axum::response::Response {
    match services.unassign_customer(&ctx, &body.username, body.customer_id) {
        Ok(()) => Json(dto::deleted("relation")).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn assign_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::CustomerRelationBulkRequest>,
) -> axum::response::Response {
    match services.assign_customers(&ctx, &body.username, &body.customer_ids) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn unassign_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::CustomerRelationBulkRequest>,
) -> axum::response::Response {
    match services.unassign_customers(&ctx, &body.username, &body.customer_ids) {
        Ok(()) => Json(dto::deleted("relations")).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn customers_of(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    match services.customers_of(&username) {
        Ok(customers) => Json(customers).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn users_of_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.users_of_customer(id) {
        Ok(users) => {
            Json(users.iter().map(dto::UserSummary::from).collect::<Vec<_>>()).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn check_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path((username, id)): Path<(String, String)>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.has_customer_permission(&username, id) {
        Ok(owns) => Json(serde_json::json!({ "has_permission": owns })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn assign_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::ProductRelationRequest>,
) -> axum::response::Response {
    match services.assign_product(&ctx, &body.username, body.product_id) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn unassign_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::ProductRelationRequest>,
) -> axum::response::Response {
    match services.unassign_product(&ctx, &body.username, body.product_id) {
        Ok(()) => Json(dto::deleted("relation")).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn assign_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::ProductRelationBulkRequest>,
) -> axum::response::Response {
    match services.assign_products(&ctx, &body.username, &body.product_ids) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn unassign_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::ProductRelationBulkRequest>,
) -> axum::response::Response {
    match services.unassign_products(&ctx, &body.username, &body.product_ids) {
        Ok(()) => Json(dto::deleted("relations")).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn products_of(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    match services.products_of(&username) {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn users_of_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.users_of_product(id) {
        Ok(users) => {
            Json(users.iter().map(dto::UserSummary::from).collect::<Vec<_>>()).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn check_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path((username, id)): Path<(String, String)>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.has_product_permission(&username, id) {
        Ok(owns) => Json(serde_json::json!({ "has_permission": owns })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
