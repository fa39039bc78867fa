use std::thread;
use std::time::Duration;

use tracing::warn;

use super::{JudgeBackend, JudgeRequest};
use crate::model::Verdict;

pub const FALLBACK_REASON: &str = "API Failed";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF)
    }
}

pub struct RetryingJudge {
    backend: Box<dyn JudgeBackend>,
    policy: RetryPolicy,
}

impl RetryingJudge {
    pub fn new(backend: Box<dyn JudgeBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Always yields a verdict: the first successful attempt, or the
    /// `{score: 0, reason: "API Failed"}` fallback after `max_attempts` failures.
    pub fn invoke_with_retry(&self, request: &JudgeRequest) -> Verdict {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            match self.backend.complete(request) {
                Ok(verdict) => return verdict,
                Err(err) => {
                    warn!(
                        kind = %request.kind,
                        attempt,
                        max_attempts,
                        error = %err,
                        "judge call failed"
                    );
                    if attempt < max_attempts && !self.policy.backoff.is_zero() {
                        thread::sleep(self.policy.backoff);
                    }
                }
            }
        }

        warn!(kind = %request.kind, max_attempts, "judge attempts exhausted; using fallback verdict");
        Verdict::fail(FALLBACK_REASON)
    }
}
