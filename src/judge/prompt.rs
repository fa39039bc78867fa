use super::JudgeKind;

pub const CONTEXT_CHAR_LIMIT: usize = 15_000;

const HALLUCINATION_RUBRIC: &str = "You are a strict fact-checker.\n\
Rules:\n\
1. If the AI Answer states any fact that is NOT in the Context, or contradicts it -> score 0.\n\
2. If every factual claim in the AI Answer is supported by the Context -> score 1.\n\
3. Respond with a JSON object only: {\"reason\": \"...\", \"score\": 0 or 1}.";

const RELEVANCE_RUBRIC: &str = "You are a response quality evaluator.\n\
Rules:\n\
1. If the AI dodges, ignores, or answers a different question than the User Query -> score 0.\n\
2. If the AI directly and clearly addresses the User Query -> score 1.\n\
3. Respond with a JSON object only: {\"reason\": \"...\", \"score\": 0 or 1}.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeRequest {
    pub kind: JudgeKind,
    pub system_prompt: &'static str,
    pub user_prompt: String,
}

impl JudgeRequest {
    pub fn live(kind: JudgeKind, context_or_query: &str, answer: &str) -> Self {
        match kind {
            JudgeKind::Hallucination => Self {
                kind,
                system_prompt: HALLUCINATION_RUBRIC,
                user_prompt: format!(
                    "Context: {}\n\nAI Answer: {answer}",
                    truncate_chars(context_or_query, CONTEXT_CHAR_LIMIT)
                ),
            },
            JudgeKind::Relevance => Self {
                kind,
                system_prompt: RELEVANCE_RUBRIC,
                user_prompt: format!("User Query: {context_or_query}\n\nAI Answer: {answer}"),
            },
        }
    }
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
