use tokio::net::TcpListener;
use url_summarizer::{
    config::Config,
    api::routes::create_router,
    db,
    summarizer,
    telemetry,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;
    telemetry::init_tracing();

    let server_addr = config.server_addr;
    let repo = db::connect(&config.database_url).await?;
    let generator = summarizer::from_config(&config);
    tracing::info!(
        environment = %config.environment,
        generator = generator.name(),
        "starting url-summarizer"
    );

    let app_state = AppState::new(config, repo, generator);
    let tasks = app_state.tasks.clone();

    // Build the router with routes
    let app = create_router(app_state);

    let listener = TcpListener::bind(server_addr).await?;
    tracing::info!(address = %server_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let in-flight summaries finish before exiting
    tasks.close();
    tracing::info!(pending = tasks.len(), "waiting for background summaries");
    tasks.wait().await;
    tracing::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
