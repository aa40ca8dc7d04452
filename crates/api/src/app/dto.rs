//! Request/response shapes that differ from the domain types.
//!
//! Entity payloads (customer/product/sell drafts) deserialize straight into
//! the domain draft types; only auth, user management, and relation requests
//! need their own shapes.

use serde::{Deserialize, Serialize};
use serde_json::json;

use orderdesk_auth::{Role, User};
use orderdesk_core::{CustomerId, ProductId};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Public view of an account: never includes the credential.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: orderdesk_core::UserId,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// Omitted => STAFF. Anything else requires the OWNER role.
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct CustomerRelationRequest {
    pub username: String,
    pub customer_id: CustomerId,
}

#[derive(Debug, Deserialize)]
pub struct CustomerRelationBulkRequest {
    pub username: String,
    pub customer_ids: Vec<CustomerId>,
}

#[derive(Debug, Deserialize)]
pub struct ProductRelationRequest {
    pub username: String,
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
pub struct ProductRelationBulkRequest {
    pub username: String,
    pub product_ids: Vec<ProductId>,
}

/// `?name=&company=&province=` narrowing for customer listings.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    pub name: Option<String>,
    pub company: Option<String>,
    pub province: Option<String>,
}

/// `?name=` narrowing for product listings.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub is_paid: bool,
}

pub fn deleted(what: &str) -> serde_json::Value {
    json!({ "deleted": what })
}
