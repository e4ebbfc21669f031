//! Cross-workflow comparison and ranking

use crate::models::{
    AnswerComparison, EvaluationResult, FaithfulnessComparison, RankedWorkflow,
    RetrievalComparison, WorkflowComparison,
};

/// Composite score weights: source count, diversity, citations, overlap
const SOURCE_WEIGHT: f64 = 0.2;
const DIVERSITY_WEIGHT: f64 = 0.2;
const CITATION_WEIGHT: f64 = 0.3;
const OVERLAP_WEIGHT: f64 = 0.3;

fn average(results: &[EvaluationResult], field: impl Fn(&EvaluationResult) -> f64) -> f64 {
    results.iter().map(field).sum::<f64>() / results.len() as f64
}

/// Compare multiple workflow results. Returns None when there is nothing to
/// compare.
pub fn compare_workflows(results: &[EvaluationResult]) -> Option<WorkflowComparison> {
    if results.is_empty() {
        return None;
    }

    Some(WorkflowComparison {
        workflows: results.iter().map(|r| r.workflow_id.clone()).collect(),
        retrieval: RetrievalComparison {
            avg_sources: average(results, |r| r.retrieval.num_sources as f64),
            avg_diversity: average(results, |r| r.retrieval.source_diversity),
        },
        answer: AnswerComparison {
            avg_length: average(results, |r| r.answer.answer_length as f64),
            avg_citations: average(results, |r| r.answer.citation_count as f64),
            avg_overlap: average(results, |r| r.answer.answer_source_overlap),
        },
        faithfulness: FaithfulnessComparison {
            pct_with_citations: average(results, |r| {
                if r.faithfulness.has_citations {
                    100.0
                } else {
                    0.0
                }
            }),
            avg_claims: average(results, |r| r.faithfulness.claims_count as f64),
        },
    })
}

/// Composite score used for ranking, higher is better
pub fn composite_score(result: &EvaluationResult) -> f64 {
    SOURCE_WEIGHT * result.retrieval.num_sources as f64
        + DIVERSITY_WEIGHT * result.retrieval.source_diversity
        + CITATION_WEIGHT * result.answer.citation_count as f64
        + OVERLAP_WEIGHT * result.answer.answer_source_overlap
}

/// Rank workflows by composite score, best first. Ties keep input order.
pub fn rank_workflows(results: &[EvaluationResult]) -> Vec<RankedWorkflow> {
    let mut ranked: Vec<RankedWorkflow> = results
        .iter()
        .map(|result| RankedWorkflow {
            workflow_id: result.workflow_id.clone(),
            score: composite_score(result),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
