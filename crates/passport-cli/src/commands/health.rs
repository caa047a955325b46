use anyhow::{Context, Result};
use colored::Colorize;
use passport_core::api::HealthResponse;
use passport_core::config::PassportConfig;

pub async fn run(config: PassportConfig, endpoint: Option<String>) -> Result<()> {
    let endpoint = endpoint.unwrap_or(config.client.endpoint);

    let health: HealthResponse = reqwest::get(&endpoint)
        .await
        .with_context(|| format!("Failed to reach {endpoint}"))?
        .error_for_status()?
        .json()
        .await
        .context("Unexpected health payload")?;

    println!("{} {}", health.status.bright_green().bold(), health.message);
    println!("{}", format!("version {}", health.version).bright_black());
    for feature in &health.features {
        println!("  - {feature}");
    }
    Ok(())
}
