use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;
use tokio::signal;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::debug!("received Ctrl+C, shutting down");
        },
        _ = terminate => {
            log::debug!("received SIGTERM, shutting down");
        }
    }
}

/// Owns the long-running services of the process and coordinates their shutdown.
pub struct ServiceRegistry {
    services: Vec<Arc<dyn Service>>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl ServiceRegistry {
    pub fn register_service(&mut self, service: Arc<dyn Service>) {
        self.services.push(service);
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Starts every service and blocks until a shutdown signal arrives or a
    /// service fails. Returns the first service error, if any.
    pub async fn start(&self) -> Result<(), RegistryError> {
        let handles: Vec<_> = self
            .services
            .iter()
            .map(|service| {
                let service = Arc::clone(service);
                let token = self.shutdown.clone();
                log::debug!("Starting service: [{id}]", id = service.id());
                self.tracker.spawn(async move {
                    let result = service.start(token.clone()).await;
                    if let Err(e) = &result {
                        log::error!("Service [{id}] failed: {e}", id = service.id());
                        token.cancel();
                    }
                    result
                })
            })
            .collect();
        self.tracker.close();

        log::debug!("Registry waiting on shutdown");
        tokio::select! {
            _ = shutdown_signal() => {},
            _ = self.shutdown.cancelled() => {},
        }
        log::info!("Service registry shutting down");
        self.shutdown.cancel();
        self.tracker.wait().await;

        let mut first_error = None;
        for handle in handles {
            if let Err(e) = handle.await? {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self {
            services: vec![],
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{msg}: {source}")]
    ServiceError {
        msg: String,
        #[source]
        source: RegistrySourceError,
    },
    #[error("service task panicked: {0}")]
    Join(#[from] JoinError),
}

type RegistrySourceError = Box<dyn Error + Send + Sync>;

#[async_trait]
pub trait Service: Sync + Send {
    fn id(&self) -> String;
    async fn start(&self, shutdown_token: CancellationToken) -> Result<(), RegistryError>;
}
