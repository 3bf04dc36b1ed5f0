use anyhow::Context;
use httprouter::config::ServeConfig;
use httprouter::nested::{self, ApiApp};
use httprouter::prelude::*;
use tower_http::trace::TraceLayer;

mod items;
mod live;

use items::{ItemRouter, RequireApiKey};
use live::LiveRouter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServeConfig::from_env();
    tracing::info!("🚀 Starting example server on {}", config.bind_address());

    let mut app: ApiApp = ApiApp::new().with_config(&config);
    nested::mount_router(
        &mut app,
        Arc::new(ItemRouter::new("catalog".to_string())),
        MountOptions::new()
            .prefix("/api")
            .tags(["api"])
            .response(500, ResponseDoc::new("Internal error"))
            .guard(RequireApiKey::from_env()),
    )?;
    nested::mount_router(
        &mut app,
        Arc::new(LiveRouter::new()),
        MountOptions::new().prefix("/api"),
    )?;

    tracing::info!("Operations:\n{}", app.operations().to_json()?);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;

    app.start().await?;
    tracing::info!("✅ Server running on http://{}", listener.local_addr()?);

    let router = app.router().layer(TraceLayer::new_for_http());
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    app.shutdown().await?;
    served.context("server error")?;

    tracing::info!("👋 Server stopped");
    Ok(())
}
