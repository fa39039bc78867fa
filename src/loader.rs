use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::model::{ChatDocument, ContextDocument, ConversationPair};

const USER_ROLE: &str = "User";
const ASSISTANT_ROLE: &str = "AI/Chatbot";
const CONTEXT_SEPARATOR: &str = "\n\n";

pub fn load_pairs(path: &Path) -> Result<Vec<ConversationPair>> {
    let document: ChatDocument = read_json(path)?;
    Ok(pair_turns(&document))
}

pub fn load_knowledge_base(path: &Path) -> Result<String> {
    let document: ContextDocument = read_json(path)?;
    Ok(flatten_context(&document))
}

pub fn pair_turns(document: &ChatDocument) -> Vec<ConversationPair> {
    document
        .conversation_turns
        .windows(2)
        .enumerate()
        .filter(|(_, window)| window[0].role() == USER_ROLE && window[1].role() == ASSISTANT_ROLE)
        .map(|(index, window)| ConversationPair {
            turn_id: window[0].turn_number().unwrap_or(index as i64),
            question: window[0].message().to_string(),
            answer: window[1].message().to_string(),
        })
        .collect()
}

pub fn flatten_context(document: &ContextDocument) -> String {
    document
        .data
        .vector_data
        .iter()
        .map(|vector| vector.text())
        .filter(|text| !text.is_empty())
        .collect::<Vec<&str>>()
        .join(CONTEXT_SEPARATOR)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_adjacent_user_and_assistant_turns() {
        let raw = r#"
        {
          "chat_id": 78128,
          "conversation_turns": [
            { "turn": 1, "role": "AI/Chatbot", "message": "Hello! How can I help?" },
            { "turn": 2, "role": "User", "message": "How much does IVF cost?" },
            { "turn": 3, "role": "AI/Chatbot", "message": "Around 1.5 lakh per cycle." },
            { "turn": 4, "role": "User", "message": "Where is the clinic?" },
            { "turn": 5, "role": "User", "message": "Hello?" },
            { "turn": 6, "role": "AI/Chatbot", "message": "Call 555-1234." }
          ]
        }
        "#;

        let document: ChatDocument = serde_json::from_str(raw).expect("chat should parse");
        let pairs = pair_turns(&document);

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].turn_id, 2);
        assert_eq!(pairs[0].question, "How much does IVF cost?");
        assert_eq!(pairs[0].answer, "Around 1.5 lakh per cycle.");
        assert_eq!(pairs[1].turn_id, 5);
        assert_eq!(pairs[1].question, "Hello?");
        assert_eq!(pairs[1].answer, "Call 555-1234.");
    }

    #[test]
    fn missing_turn_number_and_message_degrade_gracefully() {
        let raw = r#"
        {
          "conversation_turns": [
            { "role": "User" },
            { "role": "AI/Chatbot", "message": "We are open daily." }
          ]
        }
        "#;

        let document: ChatDocument = serde_json::from_str(raw).expect("chat should parse");
        let pairs = pair_turns(&document);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].turn_id, 0);
        assert_eq!(pairs[0].question, "");
        assert_eq!(pairs[0].answer, "We are open daily.");
    }

    #[test]
    fn mistyped_turn_fields_do_not_abort_pairing() {
        let raw = r#"
        {
          "conversation_turns": [
            { "turn": "1", "role": "User", "message": "How much does IVF cost?" },
            { "turn": 2, "role": "AI/Chatbot", "message": "Around 1.5 lakh per cycle." },
            { "turn": 3, "role": null, "message": "stray turn" },
            { "turn": 4.5, "role": "User", "message": ["not", "text"] },
            { "turn": true, "role": "AI/Chatbot", "message": null },
            { "turn": "seven", "role": "User", "message": "Where is the clinic?" },
            { "turn": { "n": 8 }, "role": "AI/Chatbot", "message": 42 },
            { "role": 7, "message": "ignored" }
          ]
        }
        "#;

        let document: ChatDocument = serde_json::from_str(raw).expect("chat should parse");
        let pairs = pair_turns(&document);

        assert_eq!(
            pairs,
            vec![
                ConversationPair {
                    turn_id: 1,
                    question: "How much does IVF cost?".to_string(),
                    answer: "Around 1.5 lakh per cycle.".to_string(),
                },
                ConversationPair {
                    turn_id: 3,
                    question: String::new(),
                    answer: String::new(),
                },
                ConversationPair {
                    turn_id: 5,
                    question: "Where is the clinic?".to_string(),
                    answer: String::new(),
                },
            ]
        );
    }

    #[test]
    fn null_role_in_first_turn_still_pairs_the_rest() {
        let raw = r#"
        {
          "conversation_turns": [
            { "turn": 1, "role": null, "message": "Hello" },
            { "turn": 2, "role": "User", "message": "Do you open on Sundays?" },
            { "turn": 3, "role": "AI/Chatbot", "message": "Yes, from 9 to 1." }
          ]
        }
        "#;

        let document: ChatDocument = serde_json::from_str(raw).expect("chat should parse");
        let pairs = pair_turns(&document);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].turn_id, 2);
        assert_eq!(pairs[0].answer, "Yes, from 9 to 1.");
    }

    #[test]
    fn context_joins_non_empty_fragments() {
        let raw = r#"
        {
          "status": "success",
          "data": {
            "vector_data": [
              { "id": 1, "text": "IVF costs 1.5 lakh." },
              { "id": 2, "text": "" },
              { "id": 3 },
              { "id": 5, "text": 12 },
              { "id": 4, "text": "The clinic is in Bandra West." }
            ]
          }
        }
        "#;

        let document: ContextDocument = serde_json::from_str(raw).expect("context should parse");
        assert_eq!(
            flatten_context(&document),
            "IVF costs 1.5 lakh.\n\nThe clinic is in Bandra West."
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("rag-eval-missing-input-file.json");
        let err = load_pairs(&path).expect_err("missing file should fail");
        assert!(err.to_string().contains("failed to read"));
    }
}
