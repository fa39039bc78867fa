use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{RunSummary, TurnResult};
use crate::util::write_json_pretty;

const RULE_WIDTH: usize = 50;

pub fn write_report(path: &Path, results: &[TurnResult]) -> Result<()> {
    write_json_pretty(path, &results)
}

pub fn read_report(path: &Path) -> Result<Vec<TurnResult>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn write_summary(mode_label: &str, summary: &RunSummary, report_path: &Path) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    render_summary(&mut output, mode_label, summary, report_path)?;
    output.flush()?;
    Ok(())
}

fn render_summary<W: Write>(
    output: &mut W,
    mode_label: &str,
    summary: &RunSummary,
    report_path: &Path,
) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(output)?;
    writeln!(output, "{rule}")?;
    writeln!(output, "           EVALUATION SUMMARY")?;
    writeln!(output, "{rule}")?;
    writeln!(output, "Mode Used             : {mode_label}")?;
    writeln!(output, "Turns Evaluated       : {}", summary.turns)?;
    writeln!(output, "Total Cost (Est)      : ${:.5}", summary.total_cost_usd)?;
    writeln!(
        output,
        "Avg Relevance         : {:.1}%",
        summary.relevance_pass_rate * 100.0
    )?;
    writeln!(
        output,
        "Avg Factual Accuracy  : {:.1}%",
        summary.factual_pass_rate * 100.0
    )?;
    if summary.fallback_verdicts > 0 {
        writeln!(output, "Fallback Verdicts     : {}", summary.fallback_verdicts)?;
    }
    writeln!(output, "{rule}")?;
    writeln!(output, "Report saved to: {}", report_path.display())?;
    Ok(())
}
