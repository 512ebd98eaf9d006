use std::sync::Arc;

use anyhow::Context;

use bistro_api::app::{build_app, build_services};
use bistro_api::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("invalid configuration")?;
    bistro_observability::init(settings.log_format);

    if settings.jwt_secret_defaulted {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let services = build_services(&settings)
        .await
        .context("failed to initialise services")?;
    let app = build_app(Arc::new(services), &settings.jwt);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
