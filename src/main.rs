use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use link_preview_server::app::build_router;
use link_preview_server::config::Config;
use link_preview_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing — JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("link_preview_server=info,tower_http=info"));

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 Link preview server starting...");

    let config = Config::from_env().expect("Failed to load configuration");
    info!(
        timeout_secs = config.fetch.timeout.as_secs(),
        max_content_length = config.fetch.max_content_length,
        oembed_endpoint = %config.oembed_endpoint,
        "📝 Configuration loaded"
    );

    let app_state = AppState::from_config(&config).expect("Failed to build HTTP client");

    // CORS: permissive in dev, restrictive in production.
    let cors = if config.is_dev {
        info!("🔓 CORS: permissive (dev mode)");
        CorsLayer::permissive()
    } else {
        tracing::warn!("🔒 CORS: restrictive (production mode). Cross-origin requests will be denied.");
        CorsLayer::new()
    };

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = build_router(app_state)
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer)
        .layer(cors);

    let addr = config.server_addr();
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
