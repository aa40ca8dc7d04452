use chrono::Duration;

use orderdesk_api::app::{build_app, AppConfig};

#[tokio::main]
async fn main() {
    orderdesk_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let token_ttl = std::env::var("TOKEN_TTL_HOURS")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .map(Duration::hours)
        .unwrap_or_else(|| Duration::hours(12));

    let mut config = AppConfig::new(jwt_secret);
    config.token_ttl = token_ttl;

    // The store is in-memory, so the first OWNER account has to come from
    // the environment.
    if let (Ok(username), Ok(password)) = (
        std::env::var("BOOTSTRAP_OWNER_USERNAME"),
        std::env::var("BOOTSTRAP_OWNER_PASSWORD"),
    ) {
        config = config.with_owner(username, password);
    }

    let app = build_app(config);

    let addr = std::env::var("ORDERDESK_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
