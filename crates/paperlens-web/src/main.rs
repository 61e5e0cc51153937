use std::net::SocketAddr;
use std::sync::Arc;

use paperlens_core::{OpenAiClient, Orchestrator, config_file};
use paperlens_pdf_mupdf::MupdfBackend;
use paperlens_web::AppState;

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "paperlens_web=info,paperlens_core=info,tower_http=info".into());

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let env = |key: &str| std::env::var(key).ok();
    let file = config_file::load_config();
    let config = Arc::new(config_file::resolve(&file, env));
    let server = config_file::resolve_server(&file, env);

    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; analysis requests will fail");
    }
    tracing::info!(?config, "configuration loaded");

    // One connection pool for model calls and PDF downloads.
    let http = reqwest::Client::new();
    let model = Arc::new(OpenAiClient::from_config(&config).with_http_client(http.clone()));
    let orchestrator =
        Orchestrator::new(config, model, Arc::new(MupdfBackend::new())).with_http_client(http);
    let state = Arc::new(AppState::new(orchestrator));

    let app = paperlens_web::app(state, &server)?;

    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;
    tracing::info!(%addr, cors_origin = %server.cors_origin, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
