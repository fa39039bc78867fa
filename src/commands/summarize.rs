use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::SummarizeArgs;
use crate::report::{read_report, write_summary};
use crate::summary::summarize;

const REPORT_MODE_LABEL: &str = "REPLAYED (from saved report)";

pub fn run(args: SummarizeArgs) -> Result<()> {
    let results = read_report(&args.report_path)?;
    let summary = summarize(&results);

    info!(
        path = %args.report_path.display(),
        turns = summary.turns,
        "loaded evaluation report"
    );

    if args.json {
        let mut output = io::BufWriter::new(io::stdout().lock());
        serde_json::to_writer_pretty(&mut output, &summary)
            .context("failed to serialize summary json output")?;
        writeln!(output)?;
        output.flush()?;
        return Ok(());
    }

    write_summary(REPORT_MODE_LABEL, &summary, &args.report_path)
}
