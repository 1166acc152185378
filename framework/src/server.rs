use crate::config::{Config, ServerConfig};
use crate::http::{collect_body, HttpResponse, Request};
use crate::routing::Router;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct Server {
    router: Arc<Router>,
    config: ServerConfig,
}

impl Server {
    pub fn new(router: impl Into<Router>, config: ServerConfig) -> Self {
        Self {
            router: Arc::new(router.into()),
            config,
        }
    }

    /// Server configured from the registered `ServerConfig`
    pub fn from_config(router: impl Into<Router>) -> Self {
        let config = Config::get::<ServerConfig>().unwrap_or_else(ServerConfig::from_env);
        Self::new(router, config)
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Accept connections until Ctrl+C
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.addr()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%addr, routes = self.router.table().len(), "Server listening");

        let router = self.router;
        let limit = self.config.max_body_size;

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutting down");
                    return Ok(());
                }
            };
            let io = TokioIo::new(stream);
            let router = router.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let router = router.clone();
                    async move { Ok::<_, Infallible>(handle_request(router, limit, req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::warn!(%peer, error = %err, "Error serving connection");
                }
            });
        }
    }
}

async fn handle_request(
    router: Arc<Router>,
    limit: usize,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let body = match collect_body(body, limit).await {
        Ok(body) => body,
        Err(err) => return HttpResponse::from(err).into_hyper(),
    };

    router
        .dispatch(Request::from_parts(parts, body))
        .await
        .into_hyper()
}
