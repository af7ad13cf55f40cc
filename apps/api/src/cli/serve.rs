use std::net::SocketAddr;

use anyhow::Result;
use tracing::info;

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

pub async fn handle_serve(args: ServeArgs, config: Config) -> Result<()> {
    let port = args.port.unwrap_or(config.port);
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
