use anyhow::{Context, Result};
use tiktoken_rs::CoreBPE;
use tiktoken_rs::tokenizer::{Tokenizer, get_tokenizer};
use tracing::info;

use crate::model::CostMetrics;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_INPUT_COST_PER_1K: f64 = 0.0005;
pub const DEFAULT_OUTPUT_COST_PER_1K: f64 = 0.0015;
pub const FALLBACK_ENCODING: Tokenizer = Tokenizer::Cl100kBase;

const COST_SCALE: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            input_per_1k: DEFAULT_INPUT_COST_PER_1K,
            output_per_1k: DEFAULT_OUTPUT_COST_PER_1K,
        }
    }
}

pub struct CostEstimator {
    bpe: CoreBPE,
    encoding_name: &'static str,
    fallback: bool,
    rates: Rates,
}

impl CostEstimator {
    pub fn for_model(model: &str, rates: Rates) -> Result<Self> {
        let (encoding, fallback) = match get_tokenizer(model.trim()) {
            Some(tokenizer) => (tokenizer, false),
            None => (FALLBACK_ENCODING, true),
        };

        let encoding_name = encoding_label(&encoding);
        let bpe = tiktoken_rs::get_bpe_from_tokenizer(encoding)
            .with_context(|| format!("failed to load {encoding_name} encoding"))?;

        if fallback {
            info!(
                model = %model,
                encoding = encoding_name,
                "no encoding registered for model; using fallback"
            );
        }

        Ok(Self {
            bpe,
            encoding_name,
            fallback,
            rates,
        })
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding_name
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_with_special_tokens(text).len()
    }

    pub fn estimate(&self, input_text: &str, output_text: &str) -> CostMetrics {
        let tokens_input = self.count_tokens(input_text);
        let tokens_output = self.count_tokens(output_text);

        let cost = (tokens_input as f64 / 1000.0) * self.rates.input_per_1k
            + (tokens_output as f64 / 1000.0) * self.rates.output_per_1k;

        CostMetrics {
            tokens_input,
            tokens_output,
            estimated_cost_usd: round_cost(cost),
        }
    }
}

/// Rounds half away from zero at six fractional digits.
pub fn round_cost(value: f64) -> f64 {
    (value * COST_SCALE).round() / COST_SCALE
}

fn encoding_label(tokenizer: &Tokenizer) -> &'static str {
    match tokenizer {
        Tokenizer::O200kBase => "o200k_base",
        Tokenizer::Cl100kBase => "cl100k_base",
        Tokenizer::P50kBase => "p50k_base",
        Tokenizer::P50kEdit => "p50k_edit",
        Tokenizer::R50kBase => "r50k_base",
        Tokenizer::Gpt2 => "gpt2",
        #[allow(unreachable_patterns)]
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> CostEstimator {
        CostEstimator::for_model(DEFAULT_MODEL, Rates::default()).expect("estimator should load")
    }

    #[test]
    fn empty_text_costs_nothing() {
        let metrics = estimator().estimate("", "");
        assert_eq!(metrics.tokens_input, 0);
        assert_eq!(metrics.tokens_output, 0);
        assert_eq!(metrics.estimated_cost_usd, 0.0);
    }

    #[test]
    fn estimate_is_reproducible() {
        let estimator = estimator();
        let question = "What does a single IVF cycle cost at the Bandra clinic?";
        let answer = "A single cycle usually costs between 1.5 and 2 lakh rupees, medicines included.";

        let first = estimator.estimate(question, answer);
        let second = estimator.estimate(question, answer);
        assert_eq!(first, second);
        assert_eq!(
            first.estimated_cost_usd.to_bits(),
            second.estimated_cost_usd.to_bits()
        );
        assert!(first.tokens_input > 0);
        assert!(first.tokens_output > 0);
    }

    #[test]
    fn cost_follows_per_thousand_rates() {
        let estimator = estimator();
        let metrics = estimator.estimate("hello world", "");
        let expected = round_cost(metrics.tokens_input as f64 / 1000.0 * DEFAULT_INPUT_COST_PER_1K);
        assert_eq!(metrics.estimated_cost_usd, expected);

        let metrics = estimator.estimate("", "hello world");
        let expected =
            round_cost(metrics.tokens_output as f64 / 1000.0 * DEFAULT_OUTPUT_COST_PER_1K);
        assert_eq!(metrics.estimated_cost_usd, expected);
    }

    #[test]
    fn known_model_uses_registered_encoding() {
        let estimator = estimator();
        assert_eq!(estimator.encoding_name(), "cl100k_base");
        assert!(!estimator.is_fallback());
    }

    #[test]
    fn unknown_model_falls_back_silently() {
        let estimator = CostEstimator::for_model("house-judge-7b", Rates::default())
            .expect("fallback encoding should load");
        assert_eq!(estimator.encoding_name(), "cl100k_base");
        assert!(estimator.is_fallback());
        assert!(estimator.count_tokens("Call 555-1234.") > 0);
    }

    #[test]
    fn round_cost_keeps_six_digits() {
        assert_eq!(round_cost(0.0000014), 0.000001);
        assert_eq!(round_cost(0.0000016), 0.000002);
        assert_eq!(round_cost(0.0123456789), 0.012346);
    }
}
