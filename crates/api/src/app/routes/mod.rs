use axum::{routing::get, Router};

pub mod auth;
pub mod customers;
pub mod products;
pub mod relations;
pub mod sells;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/users", users::router())
        .nest("/customers", customers::router())
        .nest("/products", products::router())
        .nest("/sells", sells::router())
        .nest("/user-customer-relations", relations::customer_router())
        .nest("/user-product-relations", relations::product_router())
}
