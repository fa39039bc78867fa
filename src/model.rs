use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPair {
    pub turn_id: i64,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostMetrics {
    pub tokens_input: usize,
    pub tokens_output: usize,
    pub estimated_cost_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub score: u8,
    pub reason: String,
}

impl Verdict {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            score: 1,
            reason: reason.into(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            score: 0,
            reason: reason.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.score == 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMetrics {
    pub cost: CostMetrics,
    pub factual: Verdict,
    pub relevance: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub turn_id: i64,
    pub metrics: TurnMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub turns: usize,
    pub total_cost_usd: f64,
    pub relevance_passed: usize,
    pub factual_passed: usize,
    pub relevance_pass_rate: f64,
    pub factual_pass_rate: f64,
    pub fallback_verdicts: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatDocument {
    #[serde(default)]
    pub conversation_turns: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatTurn {
    #[serde(default)]
    pub turn: Option<Value>,
    #[serde(default)]
    pub role: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl ChatTurn {
    pub fn turn_number(&self) -> Option<i64> {
        match self.turn.as_ref()? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn role(&self) -> &str {
        text_or_empty(self.role.as_ref())
    }

    pub fn message(&self) -> &str {
        text_or_empty(self.message.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextDocument {
    #[serde(default)]
    pub data: ContextData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextData {
    #[serde(default)]
    pub vector_data: Vec<ContextVector>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextVector {
    #[serde(default)]
    pub text: Option<Value>,
}

impl ContextVector {
    pub fn text(&self) -> &str {
        text_or_empty(self.text.as_ref())
    }
}

fn text_or_empty(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSource {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostRates {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub mode: String,
    pub model: String,
    pub encoding: String,
    pub encoding_fallback: bool,
    pub rates: CostRates,
    pub retry: RetrySettings,
    pub chat_source: InputSource,
    pub context_source: InputSource,
    pub knowledge_base_chars: usize,
    pub pair_count: usize,
    pub report_path: String,
    pub duration_ms: u128,
    pub summary: RunSummary,
}
