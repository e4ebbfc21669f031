//! Reference-free evaluation metrics for RAG workflows
//!
//! These metrics require no ground-truth labels.

pub mod calculator;
pub mod compare;

pub use calculator::{
    answer_metrics, evaluate_response, faithfulness_metrics, retrieval_metrics,
};
pub use compare::{compare_workflows, composite_score, rank_workflows};
