use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use orderdesk_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/role", put(change_role))
        .route("/by-username/:username", get(get_by_username))
        .route("/exists/:username", get(username_exists))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    match services.create_user(&ctx, &body.username, &body.password, body.role) {
        Ok(user) => (StatusCode::CREATED, Json(dto::UserSummary::from(&user))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_users() {
        Ok(users) => {
            Json(users.iter().map(dto::UserSummary::from).collect::<Vec<_>>()).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.get_user(id) {
        Ok(user) => Json(dto::UserSummary::from(&user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_by_username(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    match services.get_user_by_username(&username) {
        Ok(user) => Json(dto::UserSummary::from(&user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn username_exists(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    match services.username_exists(&username) {
        Ok(exists) => Json(serde_json::json!({ "exists": exists })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.update_user(&ctx, id, &body.username, &body.password) {
        Ok(user) => Json(dto::UserSummary::from(&user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn change_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ChangeRoleRequest>,
) -> axum::response::Response {
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.change_user_role(&ctx, id, body.role) {
        Ok(user) => Json(dto::UserSummary::from(&user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.delete_user(&ctx, id) {
        Ok(()) => Json(dto::deleted("user")).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
