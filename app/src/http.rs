use crate::modules::activity;
use crate::modules::activity::service::ActivityRegistry;
use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use serde::Deserialize;
use signup_core::config::{self, ConfigError, ESource};
use signup_core::http::{HttpServer, ServerConfig};
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const INDEX_PATH: &str = "/static/index.html";

/// Where the front-end assets live. Read from the `[http]` section.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct AssetsConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}

impl AssetsConfig {
    pub(crate) fn read(source: &ESource) -> Result<Self, ConfigError> {
        Ok(config::read_struct(source, &config::path(&["http"]))?.unwrap_or_default())
    }
}

pub(crate) fn server(source: &ESource, registry: Arc<ActivityRegistry>) -> Result<HttpServer, ConfigError> {
    let server_config = ServerConfig::read(source)?;
    let assets = AssetsConfig::read(source)?;
    Ok(HttpServer::new(server_config, vec![app_router(registry, &assets)]))
}

pub(crate) fn app_router(registry: Arc<ActivityRegistry>, assets: &AssetsConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(activity::api::Api::build_router(registry))
        .nest_service("/static", ServeDir::new(&assets.static_dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", activity::api::Api::openapi()))
}

async fn root() -> Redirect {
    Redirect::temporary(INDEX_PATH)
}
