use tracing::info;

use crate::cost::CostEstimator;
use crate::judge::{JudgeKind, Oracle};
use crate::model::{ConversationPair, TurnMetrics, TurnResult};

pub struct EvaluationPipeline {
    estimator: CostEstimator,
    oracle: Oracle,
}

impl EvaluationPipeline {
    pub fn new(estimator: CostEstimator, oracle: Oracle) -> Self {
        Self { estimator, oracle }
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    pub fn evaluate(&mut self, pairs: &[ConversationPair], knowledge_base: &str) -> Vec<TurnResult> {
        let mut results = Vec::with_capacity(pairs.len());

        for (index, pair) in pairs.iter().enumerate() {
            let cost = self.estimator.estimate(&pair.question, &pair.answer);
            let factual = self
                .oracle
                .judge(JudgeKind::Hallucination, knowledge_base, &pair.answer);
            let relevance = self
                .oracle
                .judge(JudgeKind::Relevance, &pair.question, &pair.answer);

            info!(
                turn_id = pair.turn_id,
                progress = %format!("{}/{}", index + 1, pairs.len()),
                relevance = relevance.score,
                factual = factual.score,
                cost_usd = cost.estimated_cost_usd,
                "turn evaluated"
            );

            results.push(TurnResult {
                turn_id: pair.turn_id,
                metrics: TurnMetrics {
                    cost,
                    factual,
                    relevance,
                },
            });
        }

        results
    }
}
