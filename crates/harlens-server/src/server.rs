use crate::handler::handle;
use crate::{Result, ServerConfig};
use http::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP server accepting HAR uploads for analysis
pub struct UploadServer {
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl UploadServer {
    /// Bind the listening socket described by `config`
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let addr = config.addr();
        tracing::debug!("Binding upload server to {}", addr);

        let listener = TcpListener::bind(addr).await?;

        Ok(Self {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("✓ Upload server listening on http://{}", self.local_addr()?);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };

                    tracing::debug!("Accepted connection from {}", peer);

                    let config = Arc::clone(&self.config);
                    tokio::spawn(async move {
                        let service = service_fn(move |req: Request<Incoming>| {
                            handle(req, Arc::clone(&config))
                        });
                        if let Err(e) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            tracing::debug!("Connection from {} ended with error: {}", peer, e);
                        }
                    });
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping upload server");
                    break;
                }
            }
        }

        Ok(())
    }
}
