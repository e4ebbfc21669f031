//! Evaluation result data models

use crate::models::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metrics for evaluating retrieval quality
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalMetrics {
    /// Number of sources retrieved
    pub num_sources: usize,
    /// Average source title length in characters
    pub avg_source_length: f64,
    /// Ratio of unique to total words across source titles
    pub source_diversity: f64,
}

/// Metrics for evaluating answer quality
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerMetrics {
    /// Length of the generated answer in characters
    pub answer_length: usize,
    /// Number of citation markers found in the answer
    pub citation_count: usize,
    /// Overlap between answer words and source title words (0-1)
    pub answer_source_overlap: f64,
}

/// Metrics for evaluating faithfulness to sources
///
/// Heuristic only; real faithfulness scoring would use an LLM judge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaithfulnessMetrics {
    /// Whether the answer references its sources at all
    pub has_citations: bool,
    /// Number of sentences making a factual claim
    pub claims_count: usize,
}

/// Complete evaluation result for a single query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The input query
    pub query: String,
    /// Workflow that produced the response
    pub workflow_id: String,
    /// Retrieval quality metrics
    pub retrieval: RetrievalMetrics,
    /// Answer quality metrics
    pub answer: AnswerMetrics,
    /// Faithfulness metrics
    pub faithfulness: FaithfulnessMetrics,
    /// The generated answer text
    pub response: String,
    /// Retrieved source documents
    pub sources: Vec<Source>,
    /// When the evaluation was computed
    pub evaluated_at: DateTime<Utc>,
}

/// Retrieval metric averages across compared workflows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalComparison {
    /// Average number of sources retrieved
    pub avg_sources: f64,
    /// Average source diversity
    pub avg_diversity: f64,
}

/// Answer metric averages across compared workflows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerComparison {
    /// Average answer length in characters
    pub avg_length: f64,
    /// Average citation count
    pub avg_citations: f64,
    /// Average answer-source overlap
    pub avg_overlap: f64,
}

/// Faithfulness metric averages across compared workflows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaithfulnessComparison {
    /// Percentage of answers containing citations (0-100)
    pub pct_with_citations: f64,
    /// Average number of claims per answer
    pub avg_claims: f64,
}

/// Aggregate comparison of multiple workflow results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowComparison {
    /// Workflow identifiers in input order
    pub workflows: Vec<String>,
    /// Retrieval averages
    pub retrieval: RetrievalComparison,
    /// Answer averages
    pub answer: AnswerComparison,
    /// Faithfulness averages
    pub faithfulness: FaithfulnessComparison,
}

/// A workflow with its composite evaluation score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedWorkflow {
    /// Workflow identifier
    pub workflow_id: String,
    /// Composite score, higher is better
    pub score: f64,
}
