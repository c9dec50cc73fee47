//! Rollcall - a natural-language assistant over a class attendance sheet.

mod cli;

use std::io::{BufRead, Write};

use cli::Cli;
use rollcall::agent::Agent;
use rollcall::config::Config;
use rollcall::dataset::{AttendanceRecord, Dataset};
use rollcall::error::{Result, RollcallError};
use rollcall::llm::{create_client, FewShotLibrary, LlmProvider};
use rollcall::logging::init_stderr_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let dataset = load_dataset(&cli.records)?;
    info!(
        students = dataset.rows().len(),
        dates = dataset.date_columns().len(),
        "Loaded attendance records from {}",
        cli.records.display()
    );

    // CLI overrides win over the config file. The config's model only
    // applies when the provider also comes from the config, so an
    // `--provider` override is not paired with a mismatched model name.
    let provider: LlmProvider = cli
        .provider
        .as_deref()
        .unwrap_or(&config.llm.provider)
        .parse()
        .map_err(RollcallError::config)?;
    let model = match (&cli.model, &cli.provider) {
        (Some(model), _) => Some(model.as_str()),
        (None, Some(_)) => None,
        (None, None) => Some(config.llm.model.as_str()),
    };
    let client = create_client(provider, model, cli.api_key.clone())?;
    info!("Using LLM provider: {}", provider);

    let few_shot_path = cli.few_shot.clone().or(config.agent.few_shot_path.clone());
    let examples = FewShotLibrary::load(few_shot_path.as_deref());

    let agent = Agent::new(dataset, client)
        .with_examples(examples)
        .with_sample_rows(config.agent.sample_rows);

    match &cli.question {
        Some(question) => {
            let answer = agent.invoke(question).await;
            println!("{}", answer);
        }
        None => repl(&agent).await?,
    }

    Ok(())
}

/// Reads attendance records from a JSON file and pivots them into a table.
fn load_dataset(path: &std::path::Path) -> Result<Dataset> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        RollcallError::dataset(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let records: Vec<AttendanceRecord> = serde_json::from_str(&contents).map_err(|e| {
        RollcallError::dataset(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    Dataset::from_records(&records)
}

/// Interactive question loop. Empty lines are ignored; "exit" or "quit" ends
/// the session.
async fn repl(agent: &Agent) -> Result<()> {
    println!("Rollcall attendance assistant. Ask a question, or type 'exit' to leave.");

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout()
            .flush()
            .map_err(|e| RollcallError::config(format!("Failed to flush stdout: {}", e)))?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| RollcallError::config(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        let answer = agent.invoke(question).await;
        println!("{}", answer);
    }

    Ok(())
}
