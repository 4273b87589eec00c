use crate::{
    auth::JwtKeys,
    axum_http::{default_routers, error_responses, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::infra;
use infra::db::postgres::postgres_connection::PgPoolSquad;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:4200",
    "http://127.0.0.1:4200",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    error_responses::configure_error_detail(config.stage);

    let jwt_keys = Arc::new(JwtKeys::new(
        &config.jwt.secret,
        config.jwt.access_ttl_minutes,
        config.jwt.refresh_ttl_hours,
    ));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/users",
            routers::users::routes(Arc::clone(&db_pool), Arc::clone(&jwt_keys)),
        )
        .nest("/api/types", routers::item_types::routes(Arc::clone(&db_pool)))
        .nest(
            "/api/categories",
            routers::categories::routes(Arc::clone(&db_pool)),
        )
        .nest("/api/items", routers::items::routes(Arc::clone(&db_pool)))
        .nest("/api/sales", routers::sales::routes(Arc::clone(&db_pool)))
        .nest(
            "/api/purchases",
            routers::purchases::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/payments",
            routers::payments::routes(Arc::clone(&db_pool), Arc::clone(&config))?,
        )
        .nest("/api/navbar", routers::navbar::routes())
        .route("/api/health-check", get(default_routers::health_check))
        .layer(Extension(jwt_keys))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(allowed_origins(&config)),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(stage = %config.stage, "Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Local dev origins, the front-end URL and `ALLOWED_ORIGINS`.
fn allowed_origins(config: &DotEnvyConfig) -> AllowOrigin {
    let origins: Vec<HeaderValue> = LOCAL_ORIGINS
        .iter()
        .map(|origin| origin.to_string())
        .chain(
            config
                .public_urls
                .front_url
                .iter()
                .map(|url| url.trim_end_matches('/').to_string()),
        )
        .chain(config.backend_server.allowed_origins.iter().cloned())
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "http: ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(origins)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    info!("Received ctrl+C signal");
}
