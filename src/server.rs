//! TCP front end: startup bootstrap and the accept loop.

use crate::services::Registry;
use crate::session::{Session, SessionError};
use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, debug, error, info, info_span, warn};

pub struct Server {
    listener: TcpListener,
    registry: Arc<dyn Registry>,
    max_line_bytes: usize,
}

impl Server {
    /// Binds, then clears live connections left over from a previous run.
    ///
    /// The schema itself is created when the store is opened.
    pub async fn bind(
        addr: &str,
        registry: Arc<dyn Registry>,
        max_line_bytes: usize,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        let stale = registry
            .clear_live_connections()
            .await
            .context("Failed to clear stale live connections")?;
        if stale > 0 {
            info!("Cleared {} stale live connection(s)", stale);
        }

        Ok(Self {
            listener,
            registry,
            max_line_bytes,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves. Sessions already
    /// running are left to finish on their own.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!("Serving on {}", addr);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer)) => self.spawn_session(stream, peer),
                        Err(e) => warn!("Failed to accept connection: {}", e),
                    }
                }
            }
        }
    }

    fn spawn_session(&self, stream: TcpStream, peer: SocketAddr) {
        debug!(%peer, "Accepted connection");
        metrics::counter!("vmhost_sessions_total").increment(1);

        let registry = Arc::clone(&self.registry);
        let max_line_bytes = self.max_line_bytes;
        let span = info_span!("session", %peer, client_id = tracing::field::Empty);

        tokio::spawn(
            async move {
                metrics::gauge!("vmhost_sessions_active").increment(1.0);

                let (read, write) = stream.into_split();
                let session = Session::new(
                    BufReader::new(read),
                    BufWriter::new(write),
                    registry,
                    max_line_bytes,
                );

                match session.run().await {
                    Ok(end) => info!(?end, "Session finished"),
                    Err(e) if e.is_disconnect() => info!("Peer disconnected"),
                    Err(SessionError::Registry(e)) => error!("Session aborted: {}", e),
                    Err(e) => warn!("Session terminated: {}", e),
                }

                metrics::gauge!("vmhost_sessions_active").decrement(1.0);
            }
            .instrument(span),
        );
    }
}
