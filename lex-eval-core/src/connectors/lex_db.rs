//! Connector for the lex-db document store
//!
//! lex-db serves its data protocol to lex-llm, not to lex-eval; only the
//! health endpoint is exercised here, for connectivity verification.

use crate::connectors::ServiceConnector;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default lex-db base URL when neither an explicit URL nor LEX_DB_HOST is set
pub const DEFAULT_LEX_DB_HOST: &str = "http://localhost:8000";

/// Overall timeout for health probes
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

const SERVICE: &str = "lex-db";

/// Health-check client for the lex-db service
pub struct LexDbConnector {
    base_url: String,
    client: Client,
}

impl LexDbConnector {
    /// Create a connector. Falls back to the LEX_DB_HOST environment
    /// variable and then the local default when no URL is given.
    pub fn new(base_url: Option<String>) -> Self {
        let base = base_url
            .or_else(|| std::env::var("LEX_DB_HOST").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_LEX_DB_HOST.to_string());
        Self::with_base_url(base)
    }

    /// Create a connector for an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        let base = base.trim_end_matches('/').to_string();
        Self {
            base_url: base,
            client: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl ServiceConnector for LexDbConnector {
    fn name(&self) -> &'static str {
        SERVICE
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.endpoint("health"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(_) => false,
        }
    }
}
