//! Assembles the lex-llm NDJSON event stream into a workflow result
//!
//! The run endpoint answers with newline-delimited JSON events. Assembly is
//! incremental: lines are fed as they arrive so long-running workflows are
//! not buffered whole before parsing.

use crate::models::{ConversationMessage, Source, WorkflowResult};
use serde::Deserialize;

/// A single event in the run stream
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Opens the stream and carries the run identifiers
    StreamStart {
        #[serde(default)]
        conversation_id: String,
        #[serde(default)]
        run_id: String,
    },
    /// Progress marker emitted between workflow stages
    WorkflowStep {
        #[serde(default)]
        data: serde_json::Value,
    },
    /// Retrieved source documents
    Sources {
        #[serde(default)]
        data: Vec<Source>,
    },
    /// Fragment of the streamed response text
    TextChunk {
        #[serde(default)]
        data: String,
    },
    /// Closes the stream and carries the final conversation history
    StreamEnd {
        #[serde(default)]
        data: StreamEndData,
    },
    /// Any event type this client does not understand
    #[serde(other)]
    Unknown,
}

/// Payload of the stream_end event
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StreamEndData {
    /// Final conversation history including this exchange
    #[serde(default)]
    pub conversation_history: Vec<ConversationMessage>,
}

/// Incrementally folds stream events into a [`WorkflowResult`].
///
/// Text chunks accumulate in arrival order. A later `sources` or
/// `stream_end` event replaces the payload of an earlier one. Unknown event
/// types and blank lines are skipped.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    conversation_id: String,
    run_id: String,
    response: String,
    sources: Vec<Source>,
    conversation_history: Vec<ConversationMessage>,
    steps_seen: usize,
}

impl StreamAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw NDJSON line. Blank lines are ignored.
    pub fn feed_line(&mut self, line: &str) -> Result<(), serde_json::Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        let event: StreamEvent = serde_json::from_str(line)?;
        self.apply(event);
        Ok(())
    }

    /// Apply a parsed event
    pub fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::StreamStart {
                conversation_id,
                run_id,
            } => {
                self.conversation_id = conversation_id;
                self.run_id = run_id;
            }
            StreamEvent::WorkflowStep { .. } => {
                self.steps_seen += 1;
                tracing::debug!(step = self.steps_seen, "workflow step");
            }
            StreamEvent::Sources { data } => self.sources = data,
            StreamEvent::TextChunk { data } => self.response.push_str(&data),
            StreamEvent::StreamEnd { data } => {
                self.conversation_history = data.conversation_history;
            }
            StreamEvent::Unknown => {}
        }
    }

    /// Number of workflow_step events seen so far
    pub fn steps_seen(&self) -> usize {
        self.steps_seen
    }

    /// Finish assembly and produce the workflow result
    pub fn finish(self) -> WorkflowResult {
        WorkflowResult {
            conversation_id: self.conversation_id,
            run_id: self.run_id,
            response: self.response,
            sources: self.sources,
            conversation_history: self.conversation_history,
        }
    }
}
