use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::{EvaluateArgs, PricingArgs};
use crate::cost::{CostEstimator, Rates};
use crate::judge::{
    LiveJudge, LiveJudgeConfig, Oracle, OracleMode, RetryPolicy, RetryingJudge, SyntheticJudge,
};

#[derive(Debug, Clone)]
pub struct LiveSettings {
    pub api_base: String,
    pub api_key_env: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    pub mode: OracleMode,
    pub model: String,
    pub rates: Rates,
    pub retry: RetryPolicy,
    pub live: LiveSettings,
    pub synthetic_delay: Duration,
    pub seed: Option<u64>,
}

impl EvaluationConfig {
    pub fn from_args(args: &EvaluateArgs) -> Result<Self> {
        if args.max_attempts == 0 {
            bail!("--max-attempts must be at least 1");
        }

        Ok(Self {
            mode: args.mode.into(),
            model: resolve_model(&args.pricing)?,
            rates: resolve_rates(&args.pricing)?,
            retry: RetryPolicy::new(args.max_attempts, Duration::from_millis(args.backoff_ms)),
            live: LiveSettings {
                api_base: args.api_base.trim().to_string(),
                api_key_env: args.api_key_env.clone(),
                request_timeout: Duration::from_secs(args.request_timeout_secs.max(1)),
            },
            synthetic_delay: Duration::from_millis(args.synthetic_delay_ms),
            seed: args.seed,
        })
    }

    pub fn build_estimator(&self) -> Result<CostEstimator> {
        CostEstimator::for_model(&self.model, self.rates)
    }

    pub fn build_oracle(&self) -> Result<Oracle> {
        match self.mode {
            OracleMode::Live => {
                let api_key = env::var(&self.live.api_key_env).with_context(|| {
                    format!(
                        "live judge requires an API key in ${}",
                        self.live.api_key_env
                    )
                })?;
                let judge = LiveJudge::new(LiveJudgeConfig {
                    base_url: self.live.api_base.clone(),
                    api_key,
                    model: self.model.clone(),
                    request_timeout: self.live.request_timeout,
                })?;
                Ok(Oracle::Live(RetryingJudge::new(Box::new(judge), self.retry)))
            }
            OracleMode::Synthetic => {
                let rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Ok(Oracle::Synthetic(SyntheticJudge::new(
                    Box::new(rng),
                    self.synthetic_delay,
                )))
            }
        }
    }
}

pub fn resolve_model(pricing: &PricingArgs) -> Result<String> {
    let model = pricing.model.trim();
    if model.is_empty() {
        bail!("--model must not be empty");
    }
    Ok(model.to_string())
}

pub fn resolve_rates(pricing: &PricingArgs) -> Result<Rates> {
    for (flag, value) in [
        ("--input-cost-per-1k", pricing.input_cost_per_1k),
        ("--output-cost-per-1k", pricing.output_cost_per_1k),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("{flag} must be a finite, non-negative number (got {value})");
        }
    }

    Ok(Rates {
        input_per_1k: pricing.input_cost_per_1k,
        output_per_1k: pricing.output_cost_per_1k,
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::judge::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS};

    fn evaluate_args(extra: &[&str]) -> EvaluateArgs {
        let mut argv = vec!["rag-eval", "evaluate"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Evaluate(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = EvaluationConfig::from_args(&evaluate_args(&[])).expect("defaults are valid");
        assert_eq!(config.mode, OracleMode::Synthetic);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.rates, Rates::default());
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.synthetic_delay, Duration::from_millis(100));
        assert_eq!(config.live.api_key_env, "OPENAI_API_KEY");
        assert!(config.seed.is_none());
    }

    #[test]
    fn retry_flag_defaults_follow_policy_constants() {
        let args = evaluate_args(&[]);
        assert_eq!(args.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(Duration::from_millis(args.backoff_ms), DEFAULT_BACKOFF);

        let args = evaluate_args(&["--max-attempts", "5", "--backoff-ms", "0"]);
        let config = EvaluationConfig::from_args(&args).expect("overrides are valid");
        assert_eq!(config.retry, RetryPolicy::new(5, Duration::ZERO));
    }

    #[test]
    fn rejects_negative_rates_and_zero_attempts() {
        let args = evaluate_args(&["--input-cost-per-1k=-0.1"]);
        assert!(EvaluationConfig::from_args(&args).is_err());

        let args = evaluate_args(&["--max-attempts", "0"]);
        assert!(EvaluationConfig::from_args(&args).is_err());

        let args = evaluate_args(&["--model", "  "]);
        assert!(EvaluationConfig::from_args(&args).is_err());
    }

    #[test]
    fn live_mode_without_api_key_is_fatal() {
        let args = evaluate_args(&[
            "--mode",
            "live",
            "--api-key-env",
            "RAG_EVAL_TEST_KEY_THAT_IS_NEVER_SET",
        ]);
        let config = EvaluationConfig::from_args(&args).expect("config is valid");
        let err = config.build_oracle().err().expect("missing key should fail");
        assert!(err.to_string().contains("RAG_EVAL_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn seeded_synthetic_oracle_is_built() {
        let args = evaluate_args(&["--seed", "17", "--synthetic-delay-ms", "0"]);
        let config = EvaluationConfig::from_args(&args).expect("config is valid");
        let oracle = config.build_oracle().expect("synthetic oracle should build");
        assert_eq!(oracle.mode(), OracleMode::Synthetic);
    }
}
