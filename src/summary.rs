use crate::judge::FALLBACK_REASON;
use crate::model::{RunSummary, TurnResult};

pub fn summarize(results: &[TurnResult]) -> RunSummary {
    let turns = results.len();
    let mut total_cost_usd = 0.0;
    let mut relevance_passed = 0usize;
    let mut factual_passed = 0usize;
    let mut fallback_verdicts = 0usize;

    for result in results {
        total_cost_usd += result.metrics.cost.estimated_cost_usd;
        if result.metrics.relevance.passed() {
            relevance_passed += 1;
        }
        if result.metrics.factual.passed() {
            factual_passed += 1;
        }
        fallback_verdicts += [&result.metrics.factual, &result.metrics.relevance]
            .iter()
            .filter(|verdict| verdict.reason == FALLBACK_REASON)
            .count();
    }

    RunSummary {
        turns,
        total_cost_usd,
        relevance_passed,
        factual_passed,
        relevance_pass_rate: pass_rate(relevance_passed, turns),
        factual_pass_rate: pass_rate(factual_passed, turns),
        fallback_verdicts,
    }
}

fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    passed as f64 / total as f64
}
