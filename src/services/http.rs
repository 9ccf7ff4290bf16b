use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Blocking HTTP client shared by the geocoder and the flag fetcher.
///
/// A `timeout_secs` of zero leaves requests unbounded.
pub fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    let mut builder = Client::builder().user_agent(user_agent.to_string());
    if timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }
    builder.build().context("Failed to build HTTP client")
}
