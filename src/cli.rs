use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::cost::{DEFAULT_INPUT_COST_PER_1K, DEFAULT_MODEL, DEFAULT_OUTPUT_COST_PER_1K};
use crate::judge::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, OracleMode};

#[derive(Parser, Debug)]
#[command(
    name = "rag-eval",
    version,
    about = "Relevance, factual grounding and cost evaluation for RAG chatbot transcripts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Evaluate(EvaluateArgs),
    Estimate(EstimateArgs),
    Summarize(SummarizeArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum JudgeMode {
    Synthetic,
    Live,
}

impl From<JudgeMode> for OracleMode {
    fn from(mode: JudgeMode) -> Self {
        match mode {
            JudgeMode::Synthetic => OracleMode::Synthetic,
            JudgeMode::Live => OracleMode::Live,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PricingArgs {
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value_t = DEFAULT_INPUT_COST_PER_1K)]
    pub input_cost_per_1k: f64,

    #[arg(long, default_value_t = DEFAULT_OUTPUT_COST_PER_1K)]
    pub output_cost_per_1k: f64,
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(long, default_value = "sample-chat-conversation-01.json")]
    pub chat_path: PathBuf,

    #[arg(long, default_value = "sample_context_vectors-01.json")]
    pub context_path: PathBuf,

    #[arg(long, default_value = "evaluation_report.json")]
    pub report_path: PathBuf,

    #[arg(long, value_enum, default_value_t = JudgeMode::Synthetic)]
    pub mode: JudgeMode,

    #[command(flatten)]
    pub pricing: PricingArgs,

    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[arg(long, default_value_t = DEFAULT_BACKOFF.as_millis() as u64)]
    pub backoff_ms: u64,

    #[arg(long, default_value = "https://api.openai.com/v1")]
    pub api_base: String,

    #[arg(long, default_value = "OPENAI_API_KEY")]
    pub api_key_env: String,

    #[arg(long, default_value_t = 60)]
    pub request_timeout_secs: u64,

    #[arg(long, default_value_t = 100)]
    pub synthetic_delay_ms: u64,

    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    #[arg(long, default_value = "")]
    pub question: String,

    #[arg(long, default_value = "")]
    pub answer: String,

    #[command(flatten)]
    pub pricing: PricingArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SummarizeArgs {
    #[arg(long, default_value = "evaluation_report.json")]
    pub report_path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
