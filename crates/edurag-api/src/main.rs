use std::env;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use edurag_core::config::LayeredConfig;
use edurag_store::memory::MemoryBundleStore;
use edurag_store::persist;
use edurag_store::ports::BundleStore;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edurag_api::routes::create_router;
use edurag_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edurag_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = env::var("EDURAG_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

    let config = LayeredConfig::with_defaults().load_from_env();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        port = port,
        model = %config.model.value,
        chunk_size = config.chunk_size.value,
        top_k = config.top_k.value,
        "Starting EduRAG API server"
    );

    let bundle_store: Arc<dyn BundleStore> = Arc::new(MemoryBundleStore::new());

    // Preload a bundle from disk when EDURAG_COURSE_DIR points at one.
    if let Ok(course_dir) = env::var("EDURAG_COURSE_DIR") {
        match persist::load_bundle(std::path::Path::new(&course_dir)) {
            Ok(Some(bundle)) => {
                tracing::info!(course_id = %bundle.meta.course_id, "Loaded course bundle from disk");
                if let Err(e) = bundle_store.put_bundle(bundle).await {
                    tracing::error!("Failed to store preloaded bundle: {}", e);
                }
            }
            Ok(None) => {
                tracing::warn!(course_dir = %course_dir, "No course bundle found in EDURAG_COURSE_DIR");
            }
            Err(e) => {
                tracing::error!("Failed to load course bundle: {}", e);
                std::process::exit(1);
            }
        }
    }

    let state = Arc::new(AppState::new(bundle_store, config));

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for http://localhost:3000");

    axum::serve(listener, app).await.unwrap();
}
