use std::thread;
use std::time::Duration;

use rand::{Rng, RngCore};

use super::JudgeKind;
use crate::model::Verdict;

pub const SYNTHETIC_PASS_PROBABILITY: f64 = 0.75;

const HALLUCINATION_PASS: &str =
    "[Mock] The answer is fully supported by the provided context text.";
const HALLUCINATION_FAIL: &str =
    "[Mock] The answer asserts details (e.g. '2025') that the context does not contain; it only covers data up to '2024'.";
const RELEVANCE_PASS: &str = "[Mock] The answer directly addresses the user's question.";
const RELEVANCE_FAIL: &str =
    "[Mock] The answer dodges the question: the user asked for a location, but the AI provided a phone number.";

pub struct SyntheticJudge {
    rng: Box<dyn RngCore>,
    delay: Duration,
}

impl SyntheticJudge {
    pub fn new(rng: Box<dyn RngCore>, delay: Duration) -> Self {
        Self { rng, delay }
    }

    pub fn judge(&mut self, kind: JudgeKind) -> Verdict {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let passed = self.rng.gen_bool(SYNTHETIC_PASS_PROBABILITY);
        match (kind, passed) {
            (JudgeKind::Hallucination, true) => Verdict::pass(HALLUCINATION_PASS),
            (JudgeKind::Hallucination, false) => Verdict::fail(HALLUCINATION_FAIL),
            (JudgeKind::Relevance, true) => Verdict::pass(RELEVANCE_PASS),
            (JudgeKind::Relevance, false) => Verdict::fail(RELEVANCE_FAIL),
        }
    }
}
