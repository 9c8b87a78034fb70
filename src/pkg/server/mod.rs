pub mod handlers;
pub mod middlewares;
pub mod router;
pub mod state;

use std::net::SocketAddr;

use crate::{conf::settings, prelude::Result};
use router::build_routes;
use state::AppState;

pub async fn listen() -> Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.listen_port)).await?;
    tracing::info!("{} listening at port {}", &settings.service_name, settings.listen_port);
    let app = build_routes(AppState::new().await?);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("could not listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received ctrl+c interrupt, closing server");
        },
        _ = terminate => {
            tracing::info!("received SIGTERM, closing server");
        }
    }
}
