//! Process bootstrap: configuration, store connection, HTTP serving.

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use zepp_ocr::{PureOcrEngine, TextRecognizer};
use zepp_server::routes::router;
use zepp_server::{AppState, Settings};
use zepp_store::{MongoJobStore, MongoUserStore, StoreClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().context("loading configuration")?;
    info!("{} v{} starting", settings.title, settings.version);

    let store = StoreClient::connect(settings.store_config())
        .await
        .context("connecting to document store")?;
    let jobs = Arc::new(MongoJobStore::new(&store));
    let users = Arc::new(MongoUserStore::new(&store));

    let ocr: Option<Arc<dyn TextRecognizer>> = match &settings.ocr_model_dir {
        Some(dir) => {
            let engine = PureOcrEngine::from_dir(dir).context("loading OCR models")?;
            Some(Arc::new(engine))
        }
        None => {
            info!("OCR model directory not configured; /jobs/ocr disabled");
            None
        }
    };

    let bind_addr = settings.bind_addr.clone();
    let state = AppState::new(settings, jobs, users, ocr);
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!("Listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        info!("shutdown signal listener failed; serving until killed");
    }
}
