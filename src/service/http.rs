use anyhow::Context;
use reqwest::Client;

use crate::config::AuditConfig;
use crate::error::Result;

/// Build the shared HTTP client. Every request made through it is bounded by
/// the configured timeout.
pub fn create_client(config: &AuditConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")?;
    Ok(client)
}
