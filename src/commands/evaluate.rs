use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::EvaluateArgs;
use crate::config::EvaluationConfig;
use crate::loader::{load_knowledge_base, load_pairs};
use crate::model::{CostRates, EvaluationRunManifest, RetrySettings};
use crate::pipeline::EvaluationPipeline;
use crate::report::{write_report, write_summary};
use crate::summary::summarize;
use crate::util::{
    input_source, manifest_path_for, now_utc_string, utc_compact_string, write_json_pretty,
};

pub fn run(args: EvaluateArgs) -> Result<()> {
    let config = EvaluationConfig::from_args(&args)?;

    info!(
        chat = %args.chat_path.display(),
        context = %args.context_path.display(),
        "loading data files"
    );
    let pairs = load_pairs(&args.chat_path).context("conversation file is required")?;
    let knowledge_base =
        load_knowledge_base(&args.context_path).context("context file is required")?;
    let chat_source = input_source(&args.chat_path)?;
    let context_source = input_source(&args.context_path)?;

    if pairs.is_empty() {
        warn!(path = %args.chat_path.display(), "no user/assistant turn pairs found; nothing to evaluate");
        return Ok(());
    }

    let estimator = config.build_estimator()?;
    let oracle = config.build_oracle()?;
    let mode = oracle.mode();
    let mut pipeline = EvaluationPipeline::new(estimator, oracle);

    let started_at = now_utc_string();
    let started = Instant::now();
    let run_id = format!("eval-{}", utc_compact_string(Utc::now()));

    info!(
        run_id = %run_id,
        mode = mode.as_str(),
        model = %config.model,
        encoding = pipeline.estimator().encoding_name(),
        turns = pairs.len(),
        knowledge_base_chars = knowledge_base.chars().count(),
        "starting evaluation"
    );

    let results = pipeline.evaluate(&pairs, &knowledge_base);
    let summary = summarize(&results);

    write_report(&args.report_path, &results)?;
    info!(path = %args.report_path.display(), turns = results.len(), "wrote evaluation report");

    let manifest = EvaluationRunManifest {
        manifest_version: 1,
        run_id,
        started_at,
        completed_at: now_utc_string(),
        mode: pipeline.oracle().mode().as_str().to_string(),
        model: config.model.clone(),
        encoding: pipeline.estimator().encoding_name().to_string(),
        encoding_fallback: pipeline.estimator().is_fallback(),
        rates: CostRates {
            input_per_1k: config.rates.input_per_1k,
            output_per_1k: config.rates.output_per_1k,
        },
        retry: RetrySettings {
            max_attempts: config.retry.max_attempts,
            backoff_ms: config.retry.backoff.as_millis() as u64,
        },
        chat_source,
        context_source,
        knowledge_base_chars: knowledge_base.chars().count(),
        pair_count: pairs.len(),
        report_path: args.report_path.display().to_string(),
        duration_ms: started.elapsed().as_millis(),
        summary: summary.clone(),
    };
    let manifest_path = manifest_path_for(&args.report_path);
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote run manifest");

    if summary.fallback_verdicts > 0 {
        warn!(
            fallback_verdicts = summary.fallback_verdicts,
            "some judgments fell back after exhausting retries"
        );
    }

    write_summary(mode.label(), &summary, &args.report_path)
}
