// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use quizforge::analytics::PerformanceAnalytics;
use quizforge::config::Config;
use quizforge::generator::{CohereClient, McqGenerator};
use quizforge::routes;
use quizforge::state::AppState;
use quizforge::store::FileStore;
use tokio::sync::RwLock;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Open the JSON-file data store
    let store = FileStore::open(&config.data_dir).expect("Failed to open data store");
    tracing::info!("Data store opened at '{}'", config.data_dir);

    // Rebuild analytics state by replaying stored results in timestamp order
    let mut analytics = PerformanceAnalytics::new();
    let replay = store.results_for_replay().await;
    let replayed = replay.len();
    for (user_id, result) in replay {
        analytics.ingest(&user_id, &result);
    }
    tracing::info!("Replayed {} stored results into analytics", replayed);

    let generator = McqGenerator::new(CohereClient::new(
        config.cohere_api_key.clone(),
        config.cohere_model.clone(),
    ));

    // Create AppState
    let state = AppState {
        store: Arc::new(store),
        analytics: Arc::new(RwLock::new(analytics)),
        generator: Arc::new(generator),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .expect("BIND_ADDR must be a valid socket address");
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
