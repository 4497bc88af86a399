//! TCP accept loop

use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::error::SignalingError;
use crate::handler::handle_connection;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, error, info};

pub struct Server {
    listener: TcpListener,
    coordinator: Arc<Coordinator>,
    queue_depth: usize,
}

impl Server {
    pub async fn bind(config: &Config) -> Result<Self, SignalingError> {
        let listener = TcpListener::bind(config.listen_addr).await?;
        Ok(Self {
            listener,
            coordinator: Arc::new(Coordinator::new(config.policy)),
            queue_depth: config.outbound_queue,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SignalingError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn coordinator(&self) -> Arc<Coordinator> {
        Arc::clone(&self.coordinator)
    }

    /// Serve until Ctrl-C
    pub async fn run(self) -> Result<(), SignalingError> {
        self.run_until(async {
            let _ = signal::ctrl_c().await;
        })
        .await
    }

    /// Serve until `shutdown` resolves. Connections already accepted keep running.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), SignalingError>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!("WebSocket server running at ws://{}", addr);
        info!("Admission policy: {:?}", self.coordinator.policy());

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down");
                    break;
                }

                accept_res = self.listener.accept() => {
                    let (stream, peer) = match accept_res {
                        Ok(v) => v,
                        Err(e) => { error!("accept error: {e}"); continue; }
                    };

                    let _ = stream.set_nodelay(true);

                    let coordinator = Arc::clone(&self.coordinator);
                    let queue_depth = self.queue_depth;
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, coordinator, queue_depth).await {
                            debug!("client {peer} error: {e}");
                        }
                    });
                }
            }
        }

        Ok(())
    }
}
