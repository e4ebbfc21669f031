//! Metric calculation over workflow responses

use crate::models::{
    AnswerMetrics, EvaluationResult, FaithfulnessMetrics, RetrievalMetrics, Source,
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Word tokenization, Unicode-aware (the corpus is Danish)
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word pattern"));

/// Citation markers: bracketed references plus the Danish citation lexicon.
/// Counted per pattern, so a bracketed reference containing a lexicon word
/// scores twice.
static CITATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\[.*?\]", r"ifølge", r"artikel", r"kilde"]
        .iter()
        .map(|p| Regex::new(p).expect("citation pattern"))
        .collect()
});

/// Danish copulas and modals, used as a whole-word claim heuristic
static CLAIM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(er|var|har|havde|blev|bliver|kan|skal|vil)\b").expect("claim pattern"));

/// Sentence boundary runs
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence pattern"));

fn words_of(text: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(text).map(|m| m.as_str())
}

/// Calculate metrics about the retrieved sources.
///
/// Source title length stands in for document size; diversity is the ratio
/// of unique to total words across all lowercased titles.
pub fn retrieval_metrics(sources: &[Source]) -> RetrievalMetrics {
    if sources.is_empty() {
        return RetrievalMetrics {
            num_sources: 0,
            avg_source_length: 0.0,
            source_diversity: 0.0,
        };
    }

    let total_chars: usize = sources.iter().map(|s| s.title.chars().count()).sum();
    let avg_length = total_chars as f64 / sources.len() as f64;

    let all_titles = sources
        .iter()
        .map(|s| s.title.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let words: Vec<&str> = words_of(&all_titles).collect();
    let unique: HashSet<&str> = words.iter().copied().collect();
    let diversity = if words.is_empty() {
        0.0
    } else {
        unique.len() as f64 / words.len() as f64
    };

    RetrievalMetrics {
        num_sources: sources.len(),
        avg_source_length: avg_length,
        source_diversity: diversity,
    }
}

/// Calculate metrics about the generated answer
pub fn answer_metrics(response: &str, sources: &[Source]) -> AnswerMetrics {
    let lowered = response.to_lowercase();

    let citation_count = CITATION_PATTERNS
        .iter()
        .map(|pattern| pattern.find_iter(&lowered).count())
        .sum();

    let response_words: HashSet<&str> = words_of(&lowered).collect();
    let mut source_words: HashSet<String> = HashSet::new();
    for source in sources {
        let title = source.title.to_lowercase();
        source_words.extend(words_of(&title).map(str::to_string));
    }

    let overlap = if response_words.is_empty() || source_words.is_empty() {
        0.0
    } else {
        let shared = response_words
            .iter()
            .filter(|word| source_words.contains(**word))
            .count();
        shared as f64 / response_words.len() as f64
    };

    AnswerMetrics {
        answer_length: response.chars().count(),
        citation_count,
        answer_source_overlap: overlap,
    }
}

/// Calculate faithfulness metrics.
///
/// Claims are approximated as sentences containing a Danish copula or modal.
pub fn faithfulness_metrics(response: &str) -> FaithfulnessMetrics {
    let lowered = response.to_lowercase();

    let has_citations = CITATION_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(&lowered));

    let claims_count = SENTENCE_SPLIT
        .split(&lowered)
        .filter(|sentence| CLAIM.is_match(sentence))
        .count();

    FaithfulnessMetrics {
        has_citations,
        claims_count,
    }
}

/// Evaluate a complete workflow response
pub fn evaluate_response(
    query: &str,
    workflow_id: &str,
    response: &str,
    sources: &[Source],
) -> EvaluationResult {
    EvaluationResult {
        query: query.to_string(),
        workflow_id: workflow_id.to_string(),
        retrieval: retrieval_metrics(sources),
        answer: answer_metrics(response, sources),
        faithfulness: faithfulness_metrics(response),
        response: response.to_string(),
        sources: sources.to_vec(),
        evaluated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceId;

    fn source(id: i64, title: &str) -> Source {
        Source {
            id: SourceId::Number(id),
            title: title.to_string(),
            url: format!("https://lex.example/{}", id),
        }
    }

    #[test]
    fn test_empty_sources_yield_zero_metrics() {
        let metrics = retrieval_metrics(&[]);
        assert_eq!(metrics.num_sources, 0);
        assert_eq!(metrics.avg_source_length, 0.0);
        assert_eq!(metrics.source_diversity, 0.0);
    }

    #[test]
    fn test_retrieval_diversity_penalizes_repeated_words() {
        let distinct = retrieval_metrics(&[source(1, "Sne i Grønland"), source(2, "Aasiaat by")]);
        let repeated = retrieval_metrics(&[source(1, "Sne sne"), source(2, "sne sne")]);

        assert_eq!(distinct.source_diversity, 1.0);
        assert_eq!(repeated.source_diversity, 0.25);
    }

    #[test]
    fn test_average_source_length_counts_characters() {
        let metrics = retrieval_metrics(&[source(1, "Ærø"), source(2, "Sjælland")]);
        // 3 and 8 code points respectively
        assert_eq!(metrics.avg_source_length, 5.5);
    }

    #[test]
    fn test_citation_count_sums_all_patterns() {
        let sources = [source(1, "Sne")];
        // one bracketed reference containing a lexicon word counts twice
        let metrics = answer_metrics("Ifølge [kilde 1] er sne frosset vand.", &sources);
        assert_eq!(metrics.citation_count, 3);
    }

    #[test]
    fn test_answer_without_citations() {
        let metrics = answer_metrics("Sne findes om vinteren", &[source(1, "Sne")]);
        assert_eq!(metrics.citation_count, 0);

        let faithfulness = faithfulness_metrics("Sne findes om vinteren");
        assert!(!faithfulness.has_citations);
    }

    #[test]
    fn test_answer_source_overlap() {
        let sources = [source(1, "Aasiaat erhverv")];
        let metrics = answer_metrics("Aasiaat havde fiskeri", &sources);
        // "aasiaat" of 3 answer words appears in the source titles
        assert!((metrics.answer_source_overlap - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_is_zero_when_either_side_is_empty() {
        assert_eq!(answer_metrics("", &[source(1, "Sne")]).answer_source_overlap, 0.0);
        assert_eq!(answer_metrics("Sne er hvid", &[]).answer_source_overlap, 0.0);
    }

    #[test]
    fn test_answer_length_counts_characters() {
        let metrics = answer_metrics("Grønlands østkyst", &[]);
        assert_eq!(metrics.answer_length, 17);
    }

    #[test]
    fn test_claims_count_requires_whole_words() {
        // "vinter" contains no claim word; "er" inside "erhverv" must not match
        let none = faithfulness_metrics("Byens erhverv");
        assert_eq!(none.claims_count, 0);

        let two = faithfulness_metrics("Sne er frosset vand. Byen har et fiskeri! Og så?");
        assert_eq!(two.claims_count, 2);
    }

    #[test]
    fn test_evaluate_response_combines_all_metrics() {
        let sources = vec![source(1, "Aasiaat"), source(2, "Grønlands byer")];
        let result = evaluate_response(
            "Hvad er Aasiaat?",
            "beta_workflow_v2_hyde",
            "Aasiaat er en by i Grønland [1].",
            &sources,
        );

        assert_eq!(result.workflow_id, "beta_workflow_v2_hyde");
        assert_eq!(result.retrieval.num_sources, 2);
        assert!(result.faithfulness.has_citations);
        assert_eq!(result.faithfulness.claims_count, 1);
        assert_eq!(result.sources.len(), 2);
    }
}
