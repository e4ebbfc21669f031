//! HTTP connectors for the externally-run lex services

pub mod lex_db;
pub mod lex_llm;

pub use lex_db::LexDbConnector;
pub use lex_llm::LexLlmConnector;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while talking to a lex service
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// The service could not be reached
    #[error("failed to connect to {service} at {base_url}: {source}")]
    Connection {
        service: &'static str,
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// A JSON response body could not be decoded
    #[error("failed to decode {context} from {service}: {source}")]
    Decode {
        service: &'static str,
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A line of the workflow event stream could not be parsed
    #[error("failed to parse workflow event stream: {source}")]
    Stream {
        #[source]
        source: serde_json::Error,
    },
}

/// Common surface for service connectivity verification
#[async_trait]
pub trait ServiceConnector {
    /// Service name used in logs and reports
    fn name(&self) -> &'static str;

    /// Base URL this connector targets
    fn base_url(&self) -> &str;

    /// True when the service answers its health endpoint
    async fn health_check(&self) -> bool;
}
