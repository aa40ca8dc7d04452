use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod, bound to an ephemeral port, with a seeded
    /// OWNER account (`boss` / `boss-pw`).
    async fn spawn() -> Self {
        let config = orderdesk_api::app::AppConfig::new("test-secret").with_owner("boss", "boss-pw");
        let app = orderdesk_api::app::build_app(config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(client: &reqwest::Client, base_url: &str, username: &str, password: &str) -> String {
    let res = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "login failed for {username}");
    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Register a STAFF account via the public endpoint and log it in.
async fn staff_token(client: &reqwest::Client, base_url: &str, username: &str) -> String {
    let res = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({ "username": username, "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    login(client, base_url, username, "pw").await
}

/// Create an account with an explicit role through the OWNER session.
async fn create_account(
    client: &reqwest::Client,
    base_url: &str,
    owner_token: &str,
    username: &str,
    role: &str,
) -> String {
    let res = client
        .post(format!("{}/api/users", base_url))
        .bearer_auth(owner_token)
        .json(&json!({ "username": username, "password": "pw", "role": role }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    login(client, base_url, username, "pw").await
}

fn customer_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "phone": "13800000000",
        "address": "1 Main St",
        "company": null,
        "province": "Guangdong",
    })
}

fn sell_body() -> serde_json::Value {
    json!({
        "kind": "retail",
        "sell_date": "2026-08-01",
        "product_name": "Amoxicillin",
        "product_quantity": 3,
        "product_spec": "box",
        "product_price": 1500,
        "total_price": 4500,
        "customer_company": null,
        "customer_name": "Li Wei",
        "customer_address": "1 Main St",
        "customer_phone": "13800000000",
        "customer_province": "Guangdong",
        "pay_method": null,
        "payment_screenshot_url": null,
    })
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/whoami", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.text().await.unwrap(), "unauthorized");

    let res = client
        .get(format!("{}/api/whoami", srv.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.text().await.unwrap(), "invalid token");
}

#[tokio::test]
async fn login_rejects_bad_credentials_with_one_generic_reason() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (username, password) in [("boss", "wrong"), ("nobody", "boss-pw")] {
        let res = client
            .post(format!("{}/api/auth/login", srv.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["message"], "invalid username or password");
    }
}

#[tokio::test]
async fn whoami_reflects_the_token_identity() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "boss", "boss-pw").await;

    let res = client
        .get(format!("{}/api/whoami", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["username"], "boss");
    assert_eq!(body["role"], "OWNER");
}

#[tokio::test]
async fn staff_customer_creation_assigns_ownership_and_scopes_listing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = staff_token(&client, &srv.base_url, "alice").await;
    let bob = staff_token(&client, &srv.base_url, "bob").await;

    let res = client
        .post(format!("{}/api/customers", srv.base_url))
        .bearer_auth(&alice)
        .json(&customer_body("Li Wei"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    // Creator sees it, the other STAFF account does not.
    let mine: serde_json::Value = client
        .get(format!("{}/api/customers", srv.base_url))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let theirs: serde_json::Value = client
        .get(format!("{}/api/customers", srv.base_url))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(theirs.as_array().unwrap().is_empty());

    // Cross-STAFF update is forbidden, creator's goes through.
    let res = client
        .put(format!("{}/api/customers/{}", srv.base_url, id))
        .bearer_auth(&bob)
        .json(&customer_body("Hijacked"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .put(format!("{}/api/customers/{}", srv.base_url, id))
        .bearer_auth(&alice)
        .json(&customer_body("Li W."))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn approved_sell_is_frozen_for_everyone() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner = login(&client, &srv.base_url, "boss", "boss-pw").await;
    let staff = staff_token(&client, &srv.base_url, "alice").await;

    let res = client
        .post(format!("{}/api/sells", srv.base_url))
        .bearer_auth(&staff)
        .json(&sell_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["is_valid"], false);
    assert_eq!(created["seller_name"], "alice");

    // STAFF cannot approve their own order.
    let res = client
        .post(format!("{}/api/sells/{}/approve", srv.base_url, id))
        .bearer_auth(&staff)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/api/sells/{}/approve", srv.base_url, id))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let approved: serde_json::Value = res.json().await.unwrap();
    assert_eq!(approved["is_valid"], true);

    // Edits and deletes now fail as state violations even for the creator.
    let res = client
        .put(format!("{}/api/sells/{}", srv.base_url, id))
        .bearer_auth(&staff)
        .json(&sell_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "an approved sell order cannot be modified");

    let res = client
        .delete(format!("{}/api/sells/{}", srv.base_url, id))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Double approval is also a state violation.
    let res = client
        .post(format!("{}/api/sells/{}/approve", srv.base_url, id))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Payment still toggles after approval.
    let res = client
        .put(format!("{}/api/sells/{}/payment?is_paid=true", srv.base_url, id))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let paid: serde_json::Value = res.json().await.unwrap();
    assert_eq!(paid["is_paid"], true);
}

#[tokio::test]
async fn auditor_reviews_but_never_touches_payment() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner = login(&client, &srv.base_url, "boss", "boss-pw").await;
    let auditor = create_account(&client, &srv.base_url, &owner, "aud", "AUDITOR").await;

    let res = client
        .post(format!("{}/api/sells", srv.base_url))
        .bearer_auth(&owner)
        .json(&sell_body())
        .send()
        .await
        .unwrap();
    let id = res.json::<serde_json::Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Review is within the AUDITOR's remit.
    let res = client
        .post(format!("{}/api/sells/{}/reject", srv.base_url, id))
        .bearer_auth(&auditor)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Payment is not.
    let res = client
        .put(format!("{}/api/sells/{}/payment?is_paid=true", srv.base_url, id))
        .bearer_auth(&auditor)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "no permission to update payment status");
}

#[tokio::test]
async fn staff_sell_listing_is_scoped_to_the_creator() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let alice = staff_token(&client, &srv.base_url, "alice").await;
    let bob = staff_token(&client, &srv.base_url, "bob").await;
    let owner = login(&client, &srv.base_url, "boss", "boss-pw").await;

    for token in [&alice, &bob] {
        let res = client
            .post(format!("{}/api/sells", srv.base_url))
            .bearer_auth(token)
            .json(&sell_body())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let mine: serde_json::Value = client
        .get(format!("{}/api/sells", srv.base_url))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["seller_name"], "alice");

    let all: serde_json::Value = client
        .get(format!("{}/api/sells", srv.base_url))
        .bearer_auth(&owner)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    // Cross-STAFF edit of a pending order is an ownership failure, not a
    // state failure.
    let bobs: serde_json::Value = client
        .get(format!("{}/api/sells", srv.base_url))
        .bearer_auth(&bob)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let bobs_id = bobs[0]["id"].as_str().unwrap();
    let res = client
        .put(format!("{}/api/sells/{}", srv.base_url, bobs_id))
        .bearer_auth(&alice)
        .json(&sell_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_product_registration_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let owner = login(&client, &srv.base_url, "boss", "boss-pw").await;

    let body = json!({
        "name": "Amoxicillin",
        "manufacturer": "Acme Pharma",
        "description": null,
        "base_price": 1500,
        "stock_quantity": 100,
        "expiry": { "year": 2027, "month": 6 },
    });

    let res = client
        .post(format!("{}/api/products", srv.base_url))
        .bearer_auth(&owner)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/api/products", srv.base_url))
        .bearer_auth(&owner)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["message"], "product already registered");
}

#[tokio::test]
async fn staff_cannot_manage_products_or_relations() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let staff = staff_token(&client, &srv.base_url, "alice").await;

    let res = client
        .post(format!("{}/api/products", srv.base_url))
        .bearer_auth(&staff)
        .json(&json!({
            "name": "Amoxicillin",
            "manufacturer": "Acme Pharma",
            "description": null,
            "base_price": null,
            "stock_quantity": 0,
            "expiry": null,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/api/user-customer-relations", srv.base_url))
        .bearer_auth(&staff)
        .json(&json!({
            "username": "alice",
            "customer_id": uuid::Uuid::now_v7().to_string(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn owner_grants_and_revokes_customer_ownership() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner = login(&client, &srv.base_url, "boss", "boss-pw").await;
    let staff = staff_token(&client, &srv.base_url, "alice").await;

    // Customer created by the OWNER, so no auto-assignment.
    let res = client
        .post(format!("{}/api/customers", srv.base_url))
        .bearer_auth(&owner)
        .json(&customer_body("Li Wei"))
        .send()
        .await
        .unwrap();
    let id = res.json::<serde_json::Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let visible: serde_json::Value = client
        .get(format!("{}/api/customers", srv.base_url))
        .bearer_auth(&staff)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(visible.as_array().unwrap().is_empty());

    let res = client
        .post(format!("{}/api/user-customer-relations", srv.base_url))
        .bearer_auth(&owner)
        .json(&json!({ "username": "alice", "customer_id": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let visible: serde_json::Value = client
        .get(format!("{}/api/customers", srv.base_url))
        .bearer_auth(&staff)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(visible.as_array().unwrap().len(), 1);

    // Same grant twice is a conflict.
    let res = client
        .post(format!("{}/api/user-customer-relations", srv.base_url))
        .bearer_auth(&owner)
        .json(&json!({ "username": "alice", "customer_id": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .delete(format!("{}/api/user-customer-relations", srv.base_url))
        .bearer_auth(&owner)
        .json(&json!({ "username": "alice", "customer_id": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let visible: serde_json::Value = client
        .get(format!("{}/api/customers", srv.base_url))
        .bearer_auth(&staff)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(visible.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn me_resolves_the_bearer_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "boss", "boss-pw").await;

    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["username"], "boss");

    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
