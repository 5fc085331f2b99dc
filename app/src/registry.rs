use crate::http;
use crate::modules::activity::seed;
use crate::modules::activity::service::{ActivityRegistry, SignupPolicy};
use signup_core::config::{ConfigError, ESource};
use signup_core::registry::ServiceRegistry;
use std::sync::Arc;

pub fn build_registry(source: &ESource) -> Result<ServiceRegistry, ConfigError> {
    log::debug!("Building registry");
    let mut registry = ServiceRegistry::default();

    let policy = SignupPolicy::read(source)?;
    if policy.enforce_capacity {
        log::info!("Activity capacity is enforced on signup");
    }
    let activities = Arc::new(ActivityRegistry::new(seed::activities(), policy));

    // HTTP
    log::debug!("Registering HTTP service");
    registry.register_service(Arc::new(http::server(source, activities)?));

    log::debug!("Registry build completed");
    Ok(registry)
}
