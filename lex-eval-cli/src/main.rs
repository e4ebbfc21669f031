mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{eval_handlers, handlers};

#[derive(Parser)]
#[command(name = "lex-eval")]
#[command(version = "0.1.0")]
#[command(about = "Evaluation toolkit for lex RAG workflows")]
#[command(
    help_template = "{name} - {version}\n{about}\n\n{usage-heading}\n  {usage}\n\n{all-args}{options}\n"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify connectivity to the lex services
    ///
    /// Health-checks lex-llm and lex-db and lists the available workflows.
    /// With --workflow the workflow's metadata is fetched as well, and with
    /// --query a smoke run is executed against it.
    ///
    /// Examples:
    ///   lex-eval check
    ///   lex-eval check --workflow beta_workflow_v2_hyde --query "Hvad er sne?"
    Check {
        /// Workflow to fetch metadata for
        #[arg(short, long)]
        workflow: Option<String>,

        /// Smoke query to run against the workflow
        #[arg(short, long, requires = "workflow")]
        query: Option<String>,

        /// lex-llm server URL (overrides config and LEX_LLM_HOST)
        #[arg(long, default_value = "")]
        server: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List available workflows
    Workflows {
        /// lex-llm server URL (overrides config and LEX_LLM_HOST)
        #[arg(long, default_value = "")]
        server: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show metadata for a workflow
    Metadata {
        /// Workflow identifier
        workflow_id: String,

        /// lex-llm server URL (overrides config and LEX_LLM_HOST)
        #[arg(long, default_value = "")]
        server: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run a workflow with a query
    Run {
        /// Workflow identifier
        workflow_id: String,

        /// User query to send
        #[arg(short, long)]
        query: String,

        /// Conversation identifier (generated when omitted)
        #[arg(short, long)]
        conversation_id: Option<String>,

        /// lex-llm server URL (overrides config and LEX_LLM_HOST)
        #[arg(long, default_value = "")]
        server: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run a workflow and compute evaluation metrics
    Eval {
        /// Workflow identifier
        workflow_id: String,

        /// User query to send
        #[arg(short, long)]
        query: String,

        /// Conversation identifier (generated when omitted)
        #[arg(short, long)]
        conversation_id: Option<String>,

        /// lex-llm server URL (overrides config and LEX_LLM_HOST)
        #[arg(long, default_value = "")]
        server: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Compare workflows on the same query
    ///
    /// Runs the query on every named workflow, evaluates each response and
    /// prints an aggregate comparison plus a composite-score ranking.
    ///
    /// Example:
    ///   lex-eval compare --query "Hvad er Aasiaat?" \
    ///       --workflow beta_workflow_v2_hyde --workflow beta_workflow_v2_hybrid
    Compare {
        /// User query to send to every workflow
        #[arg(short, long)]
        query: String,

        /// Workflow to include (repeat for each)
        #[arg(short, long = "workflow", required = true)]
        workflows: Vec<String>,

        /// Write all evaluation results to a JSON file
        #[arg(short, long)]
        output: Option<String>,

        /// lex-llm server URL (overrides config and LEX_LLM_HOST)
        #[arg(long, default_value = "")]
        server: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Manage lex-eval configuration
    Config {
        /// Write a configuration file with default values
        #[arg(long)]
        init: bool,

        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Path to configuration file
        #[arg(long, default_value = "~/.config/lex-eval/config.toml")]
        config_file: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            workflow,
            query,
            server,
            json,
        } => {
            handlers::handle_check(workflow, query, server, json).await?;
        }
        Commands::Workflows { server, json } => {
            handlers::handle_workflows(server, json).await?;
        }
        Commands::Metadata {
            workflow_id,
            server,
            json,
        } => {
            handlers::handle_metadata(workflow_id, server, json).await?;
        }
        Commands::Run {
            workflow_id,
            query,
            conversation_id,
            server,
            json,
        } => {
            handlers::handle_run(workflow_id, query, conversation_id, server, json).await?;
        }
        Commands::Eval {
            workflow_id,
            query,
            conversation_id,
            server,
            json,
        } => {
            eval_handlers::handle_eval(workflow_id, query, conversation_id, server, json).await?;
        }
        Commands::Compare {
            query,
            workflows,
            output,
            server,
            json,
        } => {
            eval_handlers::handle_compare(query, workflows, output, server, json).await?;
        }
        Commands::Config {
            init,
            show,
            config_file,
        } => {
            handlers::handle_config(init, show, config_file).await?;
        }
    }

    Ok(())
}
