//! Sketch-guided reasoning CLI
//!
//! Usage:
//!   reasoner ask "Is Socrates mortal?"
//!   echo "Is Socrates mortal?" | reasoner ask --config config/reasoner.toml
//!   reasoner ask --replay replies.json --json "Is p true?"
//!   reasoner check ruleset.json

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use reasoner::{
    backend::VarisatBackend,
    config::Config,
    dsl::parse_sketch,
    engine::evaluate,
    generator::{ChatCompletionsGenerator, ScriptedGenerator, SketchGenerator},
    refine::{Answer, Refiner},
};

#[derive(Parser)]
#[command(name = "reasoner")]
#[command(about = "Answer yes/no questions by deciding generated rule sketches with a SAT solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question through the generate/decide/refine loop
    Ask {
        /// Question text; read from stdin when omitted
        question: Vec<String>,
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Replay generator responses from a JSON script instead of calling the API
        #[arg(long)]
        replay: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Decide a rule-set JSON document directly
    Check {
        /// Rule-set file; read from stdin when omitted
        file: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

async fn read_stdin() -> Result<String> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read stdin")?;
    Ok(input)
}

async fn run_ask_command(
    question: Vec<String>,
    config_path: Option<String>,
    max_iterations: Option<usize>,
    replay: Option<String>,
    json: bool,
) -> Result<()> {
    let question = if question.is_empty() {
        read_stdin().await?
    } else {
        question.join(" ")
    };
    let question = question.trim();
    if question.is_empty() {
        bail!("No question given");
    }

    let config = Config::load_or_default(config_path.as_deref())?;

    let generator: Box<dyn SketchGenerator> = match replay {
        Some(path) => Box::new(ScriptedGenerator::load(&path)?),
        None => Box::new(ChatCompletionsGenerator::from_config(&config.generator)?),
    };
    let backend = VarisatBackend::new();
    let mut refiner = Refiner::new(&backend, generator.as_ref(), &config.refine);
    if let Some(n) = max_iterations {
        refiner = refiner.with_max_iterations(n);
    }

    tracing::info!("Asking: {}", question);
    let answer = refiner.answer(question).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer_json(&answer))?);
    } else {
        println!("Answer: {}", answer.answer);
        if !answer.is_decided() {
            println!("(generator fallback: no sketch was decided)");
        }
        if let Some(sketch) = &answer.sketch {
            println!("Sketch:\n{}", serde_json::to_string_pretty(sketch)?);
        }
        println!("Iterations: {}", answer.iterations());
    }
    Ok(())
}

fn answer_json(answer: &Answer) -> serde_json::Value {
    let mut value = serde_json::json!({
        "answer": answer.answer,
        "iterations": answer.iterations(),
        "attempts": answer.attempts,
    });
    if let Some(sketch) = &answer.sketch {
        value["sketch"] = serde_json::json!(sketch);
    }
    value
}

async fn run_check_command(file: Option<String>, json: bool) -> Result<()> {
    let content = match &file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read rule set {}", path))?,
        None => read_stdin().await?,
    };
    let rule_set = parse_sketch(&content).context("Failed to parse rule set")?;

    let backend = VarisatBackend::new();
    let evaluation = evaluate(&backend, &rule_set).await;

    if json {
        let value = serde_json::json!({
            "query": rule_set.query,
            "decision": evaluation.decision,
            "report": evaluation.report,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Query: {}", rule_set.query);
    println!("Verdict: {}", evaluation.decision.verdict);
    println!("Reason: {:?}", evaluation.decision.reason);
    println!("Constraints: {}", evaluation.report.constraints);
    if !evaluation.report.contradictions.is_empty() {
        println!("Contradictions: {}", evaluation.report.contradictions.join(", "));
    }
    for skipped in &evaluation.report.skipped {
        println!("Skipped rule {}: {}", skipped.index, skipped.reason);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { question, config, max_iterations, replay, json } => {
            run_ask_command(question, config, max_iterations, replay, json).await?;
        }
        Commands::Check { file, json } => {
            run_check_command(file, json).await?;
        }
    }

    Ok(())
}
