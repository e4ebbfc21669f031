//! Stream assembly through metrics and comparison, end to end

use lex_eval_core::metrics::{compare_workflows, evaluate_response, rank_workflows};
use lex_eval_core::models::EvaluationResult;
use lex_eval_core::stream::StreamAssembler;

const QUERY: &str = "Hvad er Aasiaat og hvad er byens vigtigste erhverv?";

fn assemble_and_evaluate(workflow_id: &str, lines: &[&str]) -> EvaluationResult {
    let mut assembler = StreamAssembler::new();
    for line in lines {
        assembler.feed_line(line).unwrap();
    }
    let result = assembler.finish();
    evaluate_response(QUERY, workflow_id, &result.response, &result.sources)
}

fn hyde_stream() -> Vec<&'static str> {
    vec![
        r#"{"event": "stream_start", "conversation_id": "compare-hyde", "run_id": "run-1"}"#,
        r#"{"event": "sources", "data": [
            {"id": 1, "title": "Aasiaat", "url": "https://lex.example/aasiaat"},
            {"id": 2, "title": "Grønlands erhverv", "url": "https://lex.example/erhverv"}
        ]}"#,
        r#"{"event": "text_chunk", "data": "Aasiaat er en by i Vestgrønland [1]. "}"#,
        r#"{"event": "text_chunk", "data": "Byens vigtigste erhverv er fiskeri [2]."}"#,
        r#"{"event": "stream_end", "data": {"conversation_history": []}}"#,
    ]
}

fn hybrid_stream() -> Vec<&'static str> {
    vec![
        r#"{"event": "stream_start", "conversation_id": "compare-hybrid", "run_id": "run-2"}"#,
        r#"{"event": "sources", "data": []}"#,
        r#"{"event": "text_chunk", "data": "En by."}"#,
        r#"{"event": "stream_end", "data": {"conversation_history": []}}"#,
    ]
}

#[test]
fn evaluation_flow_from_stream_to_ranking() {
    let hyde = assemble_and_evaluate("hyde", &hyde_stream());
    let hybrid = assemble_and_evaluate("hybrid", &hybrid_stream());

    assert_eq!(hyde.retrieval.num_sources, 2);
    assert!(hyde.faithfulness.has_citations);
    assert_eq!(hybrid.retrieval.num_sources, 0);
    assert!(!hybrid.faithfulness.has_citations);

    let results = vec![hyde, hybrid];
    let comparison = compare_workflows(&results).unwrap();
    assert_eq!(comparison.workflows, vec!["hyde", "hybrid"]);
    assert_eq!(comparison.retrieval.avg_sources, 1.0);
    assert_eq!(comparison.faithfulness.pct_with_citations, 50.0);

    let ranking = rank_workflows(&results);
    assert_eq!(ranking[0].workflow_id, "hyde");
    assert!(ranking[0].score > ranking[1].score);
}

#[test]
fn evaluation_results_export_and_reload_as_json() {
    let results = vec![
        assemble_and_evaluate("hyde", &hyde_stream()),
        assemble_and_evaluate("hybrid", &hybrid_stream()),
    ];

    let exported = serde_json::to_string_pretty(&results).unwrap();
    let reloaded: Vec<EvaluationResult> = serde_json::from_str(&exported).unwrap();

    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[0].workflow_id, "hyde");
    assert_eq!(reloaded[0].retrieval, results[0].retrieval);
    assert_eq!(reloaded[1].answer, results[1].answer);
}
