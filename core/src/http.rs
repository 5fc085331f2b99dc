use crate::config::{self, ConfigError, ESource};
use crate::registry::{self, RegistryError};
use async_trait::async_trait;
use axum::Router;
use serde::Deserialize;
use std::io;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn read(source: &ESource) -> Result<Self, ConfigError> {
        Ok(config::read_struct(source, &config::path(&["http"]))?.unwrap_or_default())
    }
}

pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServerConfig, routers: Vec<Router>) -> Self {
        let router = routers
            .into_iter()
            .fold(Router::new(), |acc, router| acc.merge(router));
        Self { config, router }
    }

    async fn shutdown(token: CancellationToken) {
        token.cancelled().await;
        log::debug!("HTTP server shutting down.");
    }
}

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("IO error: {0}")]
    IoError(
        #[from]
        #[source]
        io::Error,
    ),
}

#[async_trait]
impl registry::Service for HttpServer {
    fn id(&self) -> String {
        "http".to_string()
    }

    async fn start(&self, token: CancellationToken) -> Result<(), RegistryError> {
        let host = self.config.host.as_str();
        let port = self.config.port;
        log::debug!("Starting HTTP server.");
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|e| RegistryError::ServiceError {
                msg: "Net socket error".to_string(),
                source: Box::new(HttpError::from(e)),
            })?;
        log::info!(
            "HTTP server listening on host = [{host}], port = [{port}]",
            port = listener.local_addr().map(|a| a.port()).unwrap_or(port)
        );
        match axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(Self::shutdown(token))
            .await
        {
            Ok(()) => {
                log::debug!("HTTP server exited");
                Ok(())
            }
            Err(e) => Err(RegistryError::ServiceError {
                msg: "HTTP runtime error".to_string(),
                source: Box::new(HttpError::from(e)),
            }),
        }
    }
}
