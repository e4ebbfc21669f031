//! Evaluation and comparison command handlers

use crate::cli::handlers::{init_logging_once, llm_connector, load_config, preview};
use anyhow::{Context, Result};
use lex_eval_core::metrics::{compare_workflows, evaluate_response, rank_workflows};
use lex_eval_core::models::EvaluationResult;

/// Handle the eval command
pub async fn handle_eval(
    workflow_id: String,
    query: String,
    conversation_id: Option<String>,
    server: String,
    json: bool,
) -> Result<()> {
    let config = load_config()?;
    init_logging_once(&config);

    let llm = llm_connector(&server, &config);
    let conversation_id =
        conversation_id.unwrap_or_else(|| config.generate_conversation_id());

    let run = llm
        .run_workflow(&workflow_id, &query, &conversation_id, &[])
        .await
        .with_context(|| format!("Failed to run workflow '{}'", workflow_id))?;

    let result = evaluate_response(&query, &workflow_id, &run.response, &run.sources);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_evaluation_summary(&result);
    }

    Ok(())
}

/// Handle the compare command
pub async fn handle_compare(
    query: String,
    workflows: Vec<String>,
    output: Option<String>,
    server: String,
    json: bool,
) -> Result<()> {
    let config = load_config()?;
    init_logging_once(&config);

    let llm = llm_connector(&server, &config);
    let mut results: Vec<EvaluationResult> = Vec::new();

    for workflow_id in &workflows {
        if !json {
            println!("Running workflow: {}...", workflow_id);
        }

        let conversation_id = format!("compare-{}", workflow_id);
        match llm
            .run_workflow(workflow_id, &query, &conversation_id, &[])
            .await
        {
            Ok(run) => {
                let result = evaluate_response(&query, workflow_id, &run.response, &run.sources);
                if !json {
                    print_evaluation_summary(&result);
                }
                results.push(result);
            }
            Err(e) => {
                // a failing workflow is skipped, comparison continues
                tracing::warn!(workflow_id = %workflow_id, error = %e, "workflow run failed");
                eprintln!("⚠️  Failed to run {}: {}", workflow_id, e);
            }
        }
    }

    if results.is_empty() {
        return Err(anyhow::anyhow!("No workflow produced a result"));
    }

    let comparison = compare_workflows(&results);
    let ranking = rank_workflows(&results);

    if json {
        let report = serde_json::json!({
            "comparison": &comparison,
            "ranking": &ranking,
            "results": &results,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Some(comparison) = &comparison {
        if results.len() > 1 {
            println!("{}", "=".repeat(70));
            println!("Comparison summary");
            println!("{}", "=".repeat(70));
            println!();
            println!("Workflows compared: {}", comparison.workflows.join(", "));
            println!();
            println!("Retrieval:");
            println!("  Avg sources:   {:.1}", comparison.retrieval.avg_sources);
            println!("  Avg diversity: {:.2}", comparison.retrieval.avg_diversity);
            println!();
            println!("Answer quality:");
            println!("  Avg length:    {:.0} chars", comparison.answer.avg_length);
            println!("  Avg citations: {:.1}", comparison.answer.avg_citations);
            println!(
                "  Avg overlap:   {:.1}%",
                comparison.answer.avg_overlap * 100.0
            );
            println!();
            println!("Faithfulness:");
            println!(
                "  With citations: {:.0}%",
                comparison.faithfulness.pct_with_citations
            );
            println!("  Avg claims:     {:.1}", comparison.faithfulness.avg_claims);
            println!();
            println!("Ranking (by composite score):");
            for (position, ranked) in ranking.iter().enumerate() {
                println!(
                    "  {}. {}: {:.3}",
                    position + 1,
                    ranked.workflow_id,
                    ranked.score
                );
            }
        }
    }

    if let Some(path) = output {
        let exported = serde_json::to_string_pretty(&results)?;
        std::fs::write(&path, exported)
            .with_context(|| format!("Failed to write results to {}", path))?;
        if !json {
            println!();
            println!("Results saved to {}", path);
        }
    }

    Ok(())
}

/// Print a human-readable summary of evaluation results
fn print_evaluation_summary(result: &EvaluationResult) {
    println!();
    println!("{}", "=".repeat(60));
    println!("Query:    {}", result.query);
    println!("Workflow: {}", result.workflow_id);
    println!("{}", "=".repeat(60));
    println!();
    println!("Retrieval metrics:");
    println!("  Sources retrieved: {}", result.retrieval.num_sources);
    println!(
        "  Source diversity:  {:.2}",
        result.retrieval.source_diversity
    );
    println!();
    println!("Answer metrics:");
    println!("  Answer length:         {} chars", result.answer.answer_length);
    println!("  Citations found:       {}", result.answer.citation_count);
    println!(
        "  Answer-source overlap: {:.1}%",
        result.answer.answer_source_overlap * 100.0
    );
    println!();
    println!("Faithfulness metrics:");
    println!(
        "  Has citations: {}",
        if result.faithfulness.has_citations {
            "yes"
        } else {
            "no"
        }
    );
    println!("  Claims made:   {}", result.faithfulness.claims_count);
    println!();
    println!("Response preview:");
    println!("  {}", preview(&result.response, 200));
    println!("{}", "=".repeat(60));
}
