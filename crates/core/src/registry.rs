//! Package registry availability check
//!
//! Probes a crates.io-compatible API for an existing package with the
//! requested project name. The result is advisory; callers decide whether it
//! warns or gates.

use reqwest::StatusCode;

use crate::types::{SkaffError, SkaffResult};

pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Whether a package with this name already exists on the registry.
    pub async fn name_taken(&self, name: &str) -> SkaffResult<bool> {
        let url = format!(
            "{}/api/v1/crates/{}",
            self.base_url.trim_end_matches('/'),
            name
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SkaffError::Registry(format!("failed to query {}: {}", url, e)))?;

        taken_from_status(response.status(), &url)
    }
}

fn taken_from_status(status: StatusCode, url: &str) -> SkaffResult<bool> {
    match status {
        StatusCode::OK => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        other => Err(SkaffError::Registry(format!(
            "unexpected status {} from {}",
            other, url
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_means_taken() {
        assert!(taken_from_status(StatusCode::OK, "u").unwrap());
    }

    #[test]
    fn not_found_means_available() {
        assert!(!taken_from_status(StatusCode::NOT_FOUND, "u").unwrap());
    }

    #[test]
    fn other_statuses_are_errors() {
        let error = taken_from_status(StatusCode::INTERNAL_SERVER_ERROR, "u").unwrap_err();
        assert!(matches!(error, SkaffError::Registry(_)));
    }
}
