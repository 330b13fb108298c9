use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info};
use welding_admin::router::init_router;
use welding_admin::state::init_app_state;
use welding_admin_observability::{init_metrics, init_tracing, shutdown_tracer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state()?;
    info!(
        policy = state.auth_config.policy.name(),
        deadline_secs = state.provider.deadline().as_secs(),
        "Configuration loaded"
    );

    if let Some(metrics_app) = init_metrics() {
        let metrics_address = format!(
            "{}:{}",
            state.server_config.host, state.server_config.metrics_port
        );
        let metrics_listener = TcpListener::bind(&metrics_address).await?;
        info!("Metrics available at http://{}/metrics", metrics_address);
        tokio::spawn(async move {
            if let Err(err) = axum::serve(metrics_listener, metrics_app).await {
                error!(error = %err, "Metrics server stopped");
            }
        });
    }

    let address = state.server_config.bind_address();
    let app = init_router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("Serving on http://{}", address);
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
