use std::fmt;

use tracing::debug;

use crate::model::Verdict;

mod live;
mod prompt;
mod retry;
mod synthetic;

pub use live::{LiveJudge, LiveJudgeConfig};
pub use prompt::JudgeRequest;
pub use retry::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS, FALLBACK_REASON, RetryPolicy, RetryingJudge};
pub use synthetic::SyntheticJudge;

pub const EMPTY_ANSWER_REASON: &str = "Empty answer: there is no content to evaluate.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeKind {
    Hallucination,
    Relevance,
}

impl JudgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hallucination => "hallucination",
            Self::Relevance => "relevance",
        }
    }
}

impl fmt::Display for JudgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("rate limited by judge service")]
    RateLimited,

    #[error("judge service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("judge response violated protocol: {message}")]
    Protocol { message: String },
}

pub trait JudgeBackend {
    fn complete(&self, request: &JudgeRequest) -> Result<Verdict, JudgeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleMode {
    Live,
    Synthetic,
}

impl OracleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Synthetic => "synthetic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "LIVE (Judge API)",
            Self::Synthetic => "SYNTHETIC (Simulation)",
        }
    }
}

pub enum Oracle {
    Live(RetryingJudge),
    Synthetic(SyntheticJudge),
}

impl Oracle {
    pub fn mode(&self) -> OracleMode {
        match self {
            Self::Live(_) => OracleMode::Live,
            Self::Synthetic(_) => OracleMode::Synthetic,
        }
    }

    pub fn judge(&mut self, kind: JudgeKind, context_or_query: &str, answer: &str) -> Verdict {
        if answer.trim().is_empty() {
            debug!(kind = %kind, "empty answer; skipping oracle");
            return Verdict::fail(EMPTY_ANSWER_REASON);
        }

        match self {
            Self::Live(judge) => {
                let request = JudgeRequest::live(kind, context_or_query, answer);
                judge.invoke_with_retry(&request)
            }
            Self::Synthetic(judge) => judge.judge(kind),
        }
    }
}
