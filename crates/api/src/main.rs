use taskforge_auth::AuthConfig;

#[tokio::main]
async fn main() {
    taskforge_observability::init();

    let mut config = AuthConfig::default();

    match std::env::var("JWT_SECRET") {
        Ok(secret) => config.jwt_secret = secret,
        Err(_) => tracing::warn!("JWT_SECRET not set; using insecure dev default"),
    }

    if let Ok(ttl) = std::env::var("TOKEN_TTL_SECS") {
        match ttl.parse::<i64>() {
            Ok(secs) => config.token_ttl_secs = secs,
            Err(_) => tracing::warn!("TOKEN_TTL_SECS is not a number; keeping default"),
        }
    }

    let app = taskforge_api::app::build_app(config).await;

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
