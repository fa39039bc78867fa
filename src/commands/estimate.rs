use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::EstimateArgs;
use crate::config::{resolve_model, resolve_rates};
use crate::cost::CostEstimator;
use crate::model::CostMetrics;

#[derive(Debug, Serialize)]
struct EstimateResponse {
    model: String,
    encoding: String,
    encoding_fallback: bool,
    cost: CostMetrics,
}

pub fn run(args: EstimateArgs) -> Result<()> {
    let model = resolve_model(&args.pricing)?;
    let estimator = CostEstimator::for_model(&model, resolve_rates(&args.pricing)?)?;

    let response = EstimateResponse {
        encoding: estimator.encoding_name().to_string(),
        encoding_fallback: estimator.is_fallback(),
        cost: estimator.estimate(&args.question, &args.answer),
        model,
    };

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &response)
            .context("failed to serialize estimate json output")?;
        writeln!(output)?;
    } else {
        writeln!(
            output,
            "Model: {} encoding={} fallback={}",
            response.model, response.encoding, response.encoding_fallback
        )?;
        writeln!(
            output,
            "Tokens: input={} output={}",
            response.cost.tokens_input, response.cost.tokens_output
        )?;
        writeln!(
            output,
            "Estimated cost: ${:.6}",
            response.cost.estimated_cost_usd
        )?;
    }
    output.flush()?;
    Ok(())
}
