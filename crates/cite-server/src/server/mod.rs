//! HTTP server for the citation service.

pub mod routes;

use std::net::SocketAddr;

use crate::config::Config;
use crate::service::CitationService;

/// Citation HTTP server.
pub struct CiteServer {
    service: CitationService,
    config: Config,
}

impl CiteServer {
    /// Create a server, loading the style catalog from `config.styles_dir`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let service = CitationService::new(&config);
        Self { service, config }
    }

    /// The underlying service.
    #[must_use]
    pub const fn service(&self) -> &CitationService {
        &self.service
    }

    /// Build the router without binding a socket.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        routes::create_router(
            self.service.clone(),
            self.config.admin_token.clone(),
            self.config.request_timeout,
        )
    }

    /// Serve HTTP on `port` until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error if the socket cannot be bound or the server fails.
    pub async fn run(self, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!(
            styles_dir = %self.config.styles_dir.display(),
            locale = %self.config.locale,
            admin = self.config.has_admin_token(),
            "HTTP server listening on http://{}",
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for CiteServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CiteServer").field("styles_dir", &self.config.styles_dir).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
