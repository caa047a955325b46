use std::path::Path;

use anyhow::Result;
use passport_core::config::PassportConfig;

pub async fn run(config: PassportConfig, config_path: Option<&Path>, bind: Option<String>) -> Result<()> {
    let service = super::reading_service(&config, config_path)?;
    let bind = bind.unwrap_or(config.server.bind);
    passport_application::serve(&bind, service).await?;
    Ok(())
}
