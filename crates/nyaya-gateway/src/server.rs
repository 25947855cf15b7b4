use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;

use nyaya_core::query::QueryPipeline;
use nyaya_core::summarize::Summarizer;
use nyaya_llm::any::AnyProvider;

use super::error::GatewayError;
use super::router::build_router;

const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub(crate) struct AppState {
    pub pipeline: Arc<QueryPipeline<AnyProvider>>,
    pub summarizer: Arc<Summarizer<AnyProvider>>,
    pub chunks: usize,
}

/// HTTP server exposing the question answering and summarization endpoints.
pub struct GatewayServer {
    addr: SocketAddr,
    max_body_size: usize,
    chunks: usize,
    pipeline: Arc<QueryPipeline<AnyProvider>>,
    summarizer: Arc<Summarizer<AnyProvider>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayServer {
    #[must_use]
    pub fn new(
        bind: &str,
        port: u16,
        pipeline: QueryPipeline<AnyProvider>,
        summarizer: Summarizer<AnyProvider>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let ip: IpAddr = bind.parse().unwrap_or_else(|_| {
            tracing::warn!("invalid bind address {bind}, falling back to 127.0.0.1");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        });
        if ip.is_unspecified() {
            tracing::warn!("binding to {ip}, the server is reachable from all interfaces");
        }
        Self {
            addr: SocketAddr::new(ip, port),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            chunks: 0,
            pipeline: Arc::new(pipeline),
            summarizer: Arc::new(summarizer),
            shutdown_rx,
        }
    }

    #[must_use]
    pub fn with_chunk_count(mut self, chunks: usize) -> Self {
        self.chunks = chunks;
        self
    }

    #[must_use]
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Binds the listener and serves requests until shutdown is signalled.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Bind`] when the address cannot be bound and
    /// [`GatewayError::Server`] when the server exits abnormally.
    pub async fn serve(self) -> Result<(), GatewayError> {
        let state = AppState {
            pipeline: self.pipeline,
            summarizer: self.summarizer,
            chunks: self.chunks,
        };
        let router = build_router(state, self.max_body_size);

        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayError::Bind(self.addr.to_string(), e))?;
        tracing::info!("listening on {}", self.addr);

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow_and_update() {
                    if shutdown_rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
            })
            .await
            .map_err(|e| GatewayError::Server(e.to_string()))
    }
}
