//! Wire types for the lex-llm workflow API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source document identifier as returned by lex-llm (integer or string)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum SourceId {
    /// Numeric identifier
    Number(i64),
    /// String identifier
    Text(String),
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Number(n) => write!(f, "{}", n),
            SourceId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A source document returned by a workflow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    /// Document identifier
    pub id: SourceId,
    /// Document title
    pub title: String,
    /// Document URL
    pub url: String,
}

/// Author of a message in the conversation history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
}

/// A message in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    /// Message author role
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

/// Complete result from running a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Conversation identifier echoed by the service
    pub conversation_id: String,
    /// Unique identifier of this run
    pub run_id: String,
    /// The final LLM response text
    pub response: String,
    /// Retrieved source documents
    pub sources: Vec<Source>,
    /// Conversation history including this exchange
    pub conversation_history: Vec<ConversationMessage>,
}

/// Metadata about a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    /// Unique workflow identifier
    pub workflow_id: String,
    /// Human-readable name
    pub name: String,
    /// What the workflow does
    pub description: String,
    /// Workflow version
    pub version: String,
    /// Workflow author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_accepts_numbers_and_strings() {
        let numeric: Source = serde_json::from_str(
            r#"{"id": 7, "title": "Aasiaat", "url": "https://lex.example/aasiaat"}"#,
        )
        .unwrap();
        assert_eq!(numeric.id, SourceId::Number(7));

        let textual: Source = serde_json::from_str(
            r#"{"id": "doc-7", "title": "Aasiaat", "url": "https://lex.example/aasiaat"}"#,
        )
        .unwrap();
        assert_eq!(textual.id, SourceId::Text("doc-7".to_string()));
    }

    #[test]
    fn test_source_id_round_trips_unchanged() {
        let numeric = SourceId::Number(42);
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");

        let textual = SourceId::Text("42".to_string());
        assert_eq!(serde_json::to_string(&textual).unwrap(), "\"42\"");
    }

    #[test]
    fn test_message_role_serialization() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");

        let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, MessageRole::User);
    }

    #[test]
    fn test_workflow_metadata_optional_fields() {
        let metadata: WorkflowMetadata = serde_json::from_str(
            r#"{
                "workflow_id": "beta_workflow_v2_hyde",
                "name": "Beta workflow v2 (HyDE)",
                "description": "Hypothetical document embeddings",
                "version": "2.0.0"
            }"#,
        )
        .unwrap();

        assert_eq!(metadata.workflow_id, "beta_workflow_v2_hyde");
        assert!(metadata.author.is_none());
        assert!(metadata.tags.is_none());

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(!json.contains("author"));
        assert!(!json.contains("tags"));
    }
}
