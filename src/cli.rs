//! Command-line argument parsing for Rollcall.

use clap::Parser;
use std::path::PathBuf;

/// A natural-language assistant over a class attendance sheet.
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the attendance records file (JSON array of
    /// {roll_number, name, date} entries)
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Ask a single question and exit instead of starting the REPL
    #[arg(short, long, value_name = "QUESTION")]
    pub question: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// LLM provider to use (openai, ollama, mock; overrides config)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model name (overrides config)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// OpenAI API key (falls back to the OPENAI_API_KEY environment variable)
    #[arg(long, value_name = "KEY", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Path to a few-shot example file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub few_shot: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(rollcall::config::Config::default_path)
    }
}
