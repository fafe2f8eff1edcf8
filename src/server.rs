use std::{net::SocketAddr, str::FromStr};

use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{Result, api, config};

pub fn router(state: api::SharedCallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Binds [`config::server_addr`]. Binding happens before the browser opens so
/// a busy port fails the login up front.
pub async fn bind() -> Result<TcpListener> {
    let addr = SocketAddr::from_str(&config::server_addr()).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    Ok(TcpListener::bind(addr).await?)
}

pub async fn start_api_server(listener: TcpListener, state: api::SharedCallbackState) -> Result<()> {
    tracing::debug!(addr = ?listener.local_addr().ok(), "callback server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
