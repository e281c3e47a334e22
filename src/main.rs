// Start of file: src/main.rs

use axum::{Router, serve};
use tokio::net::TcpListener;

use lab_api::config::state::AppState;
use lab_api::core::{
    logging::init_tracing,
    server::{create_app, setup_listener, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let state: AppState = AppState::from_env().await?;
    state.initialize().await?;

    let app: Router = create_app(state.clone());
    let listener: TcpListener = setup_listener(&state.environment).await?;

    tracing::info!("Server listening on: {}", listener.local_addr()?);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

// End of file: src/main.rs
