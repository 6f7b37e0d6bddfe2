use super::connection::spawn_accept_loop;
use super::proto::dns_service_server::DnsServiceServer;
use super::service::GrpcDnsService;
use super::tls::build_tls_acceptor;
use dns_bridge_application::ports::DnsEngine;
use dns_bridge_application::use_cases::ResolveQueryUseCase;
use dns_bridge_domain::{DomainError, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::{debug, error, info, warn};

/// Time allowed for cut-off calls to flush their `UNAVAILABLE` status once the
/// grace period has run out.
const CUTOFF_DRAIN: Duration = Duration::from_millis(500);

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    cutoff: CancellationToken,
    serve_task: JoinHandle<()>,
    accept_task: JoinHandle<()>,
}

/// Hosts the `coredns.dns.DnsService` gRPC endpoint in front of a
/// [`DnsEngine`].
///
/// `startup` binds and launches the serve loop in the background, returning
/// as soon as the listener is armed. `shutdown` stops it, waiting at most the
/// configured grace period before cutting in-flight calls off. Both are safe
/// to call in any order and any number of times.
pub struct BridgeServer {
    config: ServerConfig,
    engine: Arc<dyn DnsEngine>,
    running: Option<RunningServer>,
}

impl BridgeServer {
    pub fn new(config: ServerConfig, engine: Arc<dyn DnsEngine>) -> Self {
        Self {
            config,
            engine,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Address the listener is bound to, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    pub async fn startup(&mut self) -> Result<SocketAddr, DomainError> {
        if self.running.is_some() {
            return Err(DomainError::AlreadyRunning);
        }

        let bind_addr = self.config.bind_address();

        let tls = match &self.config.tls {
            Some(tls_config) => Some(build_tls_acceptor(tls_config).inspect_err(|e| {
                error!(error = %e, "Failed to start gRPC handler");
            })?),
            None => None,
        };

        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            error!(bind_address = %bind_addr, error = %e, "Failed to start gRPC handler");
            DomainError::Bind {
                addr: bind_addr.clone(),
                reason: e.to_string(),
            }
        })?;

        let local_addr = listener.local_addr().map_err(|e| DomainError::Bind {
            addr: bind_addr.clone(),
            reason: e.to_string(),
        })?;

        let use_case = Arc::new(ResolveQueryUseCase::new(
            Arc::clone(&self.engine),
            self.config.local_ip(),
        ));
        let cutoff = CancellationToken::new();
        let service =
            DnsServiceServer::new(GrpcDnsService::new(use_case).with_cancellation(cutoff.clone()));

        let shutdown = CancellationToken::new();
        let tls_enabled = tls.is_some();
        let (accept_task, incoming) = spawn_accept_loop(
            listener,
            tls,
            self.config.handshake_timeout(),
            shutdown.clone(),
        );

        let serve_shutdown = shutdown.clone();
        let serve_task = tokio::spawn(async move {
            let result = Server::builder()
                .add_service(service)
                .serve_with_incoming_shutdown(incoming, async move {
                    serve_shutdown.cancelled().await;
                })
                .await;

            match result {
                Ok(()) => debug!("gRPC serve loop finished"),
                Err(e) => error!(error = %e, "gRPC server error"),
            }
        });

        info!(
            bind_address = %local_addr,
            tls = tls_enabled,
            "gRPC DNS bridge listening"
        );

        self.running = Some(RunningServer {
            local_addr,
            shutdown,
            cutoff,
            serve_task,
            accept_task,
        });

        Ok(local_addr)
    }

    pub async fn shutdown(&mut self) -> Result<(), DomainError> {
        let Some(running) = self.running.take() else {
            debug!("gRPC DNS bridge not running; nothing to stop");
            return Ok(());
        };

        info!(bind_address = %running.local_addr, "Stopping gRPC DNS bridge");
        running.shutdown.cancel();

        let grace = self.config.shutdown_grace();
        let mut serve_task = running.serve_task;
        if tokio::time::timeout(grace, &mut serve_task).await.is_err() {
            warn!(grace = ?grace, "In-flight calls did not drain in time; cutting them off");
            running.cutoff.cancel();
            if tokio::time::timeout(CUTOFF_DRAIN, &mut serve_task).await.is_err() {
                serve_task.abort();
                let _ = serve_task.await;
            }
        }

        running.accept_task.abort();
        let _ = running.accept_task.await;

        info!("gRPC DNS bridge stopped");
        Ok(())
    }
}

impl Drop for BridgeServer {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.shutdown.cancel();
            running.cutoff.cancel();
            running.serve_task.abort();
            running.accept_task.abort();
        }
    }
}
