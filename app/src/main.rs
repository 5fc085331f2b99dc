mod http;
mod modules;
mod registry;

use crate::registry::build_registry;
use signup_core::{config, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let main_config = config::init_main_config()?;
    logging::init_main_logger()?;
    log::info!("Application is starting up...");
    match main_config.origin() {
        Some(file) => log::info!("Loaded config from [{file}]"),
        None => log::info!("No config file found, using defaults"),
    }

    let registry = build_registry(main_config)?;
    registry.start().await?;

    log::info!("Application stopped");
    Ok(())
}
