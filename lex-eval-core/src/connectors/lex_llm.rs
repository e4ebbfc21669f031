//! Connector for the lex-llm workflow service

use crate::connectors::{ConnectorError, ServiceConnector};
use crate::models::{ConversationMessage, WorkflowMetadata, WorkflowResult};
use crate::stream::StreamAssembler;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Default lex-llm base URL when neither an explicit URL nor LEX_LLM_HOST is set
pub const DEFAULT_LEX_LLM_HOST: &str = "http://localhost:8001";

/// Total request timeout. Workflows can run for minutes.
const WORKFLOW_TIMEOUT: Duration = Duration::from_secs(300);
/// Overall timeout for health probes
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

const SERVICE: &str = "lex-llm";

#[derive(Serialize)]
struct RunWorkflowPayload<'a> {
    user_input: &'a str,
    conversation_id: &'a str,
    conversation_history: &'a [ConversationMessage],
}

/// Handles communication with the lex-llm service
pub struct LexLlmConnector {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl LexLlmConnector {
    /// Create a connector. Falls back to the LEX_LLM_HOST environment
    /// variable and then the local default when no URL is given.
    pub fn new(base_url: Option<String>) -> Self {
        let base = base_url
            .or_else(|| std::env::var("LEX_LLM_HOST").ok().filter(|v| !v.is_empty()))
            .unwrap_or_else(|| DEFAULT_LEX_LLM_HOST.to_string());
        Self::with_base_url(base)
    }

    /// Create a connector for an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        let base = base.trim_end_matches('/').to_string();
        Self {
            base_url: base,
            client: Client::new(),
            timeout: WORKFLOW_TIMEOUT,
        }
    }

    /// Override the total request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn connection_error(&self, source: reqwest::Error) -> ConnectorError {
        ConnectorError::Connection {
            service: SERVICE,
            base_url: self.base_url.clone(),
            source,
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ConnectorError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ConnectorError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: body.trim().to_string(),
            })
        }
    }

    /// Run a workflow and return the complete result.
    ///
    /// POSTs the run request and assembles the NDJSON event stream into a
    /// [`WorkflowResult`] as lines arrive.
    pub async fn run_workflow(
        &self,
        workflow_id: &str,
        user_input: &str,
        conversation_id: &str,
        conversation_history: &[ConversationMessage],
    ) -> Result<WorkflowResult, ConnectorError> {
        let payload = RunWorkflowPayload {
            user_input,
            conversation_id,
            conversation_history,
        };

        tracing::debug!(workflow_id, conversation_id, "running workflow");

        let response = self
            .client
            .post(self.endpoint(&format!("workflows/{}/run", workflow_id)))
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let response = Self::ensure_success(response).await?;

        let mut assembler = StreamAssembler::new();
        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.connection_error(e))?;
            buffer.extend_from_slice(&chunk);

            // Newlines are single bytes, so splitting here never cuts a
            // UTF-8 sequence.
            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line_bytes: Vec<u8> = buffer.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line_bytes[..pos]);
                assembler
                    .feed_line(&line)
                    .map_err(|source| ConnectorError::Stream { source })?;
            }
        }

        if !buffer.is_empty() {
            let line = String::from_utf8_lossy(&buffer);
            assembler
                .feed_line(&line)
                .map_err(|source| ConnectorError::Stream { source })?;
        }

        let result = assembler.finish();
        tracing::debug!(
            run_id = %result.run_id,
            response_chars = result.response.chars().count(),
            num_sources = result.sources.len(),
            "workflow completed"
        );
        Ok(result)
    }

    /// Get metadata about a specific workflow
    pub async fn get_workflow_metadata(
        &self,
        workflow_id: &str,
    ) -> Result<WorkflowMetadata, ConnectorError> {
        let response = self
            .client
            .get(self.endpoint(&format!("workflows/{}/metadata", workflow_id)))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<WorkflowMetadata>()
            .await
            .map_err(|source| ConnectorError::Decode {
                service: SERVICE,
                context: "workflow metadata",
                source,
            })
    }

    /// List all available workflows
    pub async fn list_workflows(&self) -> Result<Vec<WorkflowMetadata>, ConnectorError> {
        let response = self
            .client
            .get(self.endpoint("workflows/metadata"))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<Vec<WorkflowMetadata>>()
            .await
            .map_err(|source| ConnectorError::Decode {
                service: SERVICE,
                context: "workflow list",
                source,
            })
    }
}

#[async_trait]
impl ServiceConnector for LexLlmConnector {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let connector = LexLlmConnector::with_base_url("http://localhost:8001///");
        assert_eq!(connector.base_url(), "http://localhost:8001");
    }

    #[test]
    fn test_endpoint_joins_with_single_slash() {
        let connector = LexLlmConnector::with_base_url("http://localhost:8001");
        assert_eq!(
            connector.endpoint("workflows/metadata"),
            "http://localhost:8001/workflows/metadata"
        );
        assert_eq!(
            connector.endpoint("/health"),
            "http://localhost:8001/health"
        );
    }

    #[test]
    fn test_explicit_base_url_wins_over_default() {
        let connector = LexLlmConnector::new(Some("http://llm.internal:9001".to_string()));
        assert_eq!(connector.base_url(), "http://llm.internal:9001");
    }
}
