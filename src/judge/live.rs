use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::{JudgeBackend, JudgeError, JudgeRequest};
use crate::model::Verdict;

#[derive(Debug, Clone)]
pub struct LiveJudgeConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout: Duration,
}

pub struct LiveJudge {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl LiveJudge {
    pub fn new(config: LiveJudgeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build judge http client")?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key,
            model: config.model,
        })
    }

    fn request_body(&self, request: &JudgeRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "temperature": 0,
            "response_format": { "type": "json_object" },
        })
    }
}

impl JudgeBackend for LiveJudge {
    fn complete(&self, request: &JudgeRequest) -> Result<Verdict, JudgeError> {
        debug!(url = %self.url, model = %self.model, kind = %request.kind, "sending judge request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .map_err(|err| JudgeError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|err| JudgeError::Transport {
            message: format!("failed to read response body: {err}"),
        })?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(JudgeError::RateLimited);
        }
        if !status.is_success() {
            return Err(JudgeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

pub(super) fn parse_completion(body: &str) -> Result<Verdict, JudgeError> {
    let json: Value = serde_json::from_str(body).map_err(|err| JudgeError::Protocol {
        message: format!("invalid completion json: {err}"),
    })?;

    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| JudgeError::Protocol {
            message: "completion has no message content".to_string(),
        })?;

    parse_verdict(content)
}

pub(super) fn parse_verdict(content: &str) -> Result<Verdict, JudgeError> {
    let value: Value = serde_json::from_str(content.trim()).map_err(|err| JudgeError::Protocol {
        message: format!("verdict is not json: {err}"),
    })?;

    let score = match value.get("score").and_then(Value::as_f64) {
        Some(score) if score == 0.0 => 0,
        Some(score) if score == 1.0 => 1,
        Some(other) => {
            return Err(JudgeError::Protocol {
                message: format!("score {other} is outside {{0, 1}}"),
            });
        }
        None => {
            return Err(JudgeError::Protocol {
                message: "verdict is missing a numeric score".to_string(),
            });
        }
    };

    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .ok_or_else(|| JudgeError::Protocol {
            message: "verdict is missing a reason".to_string(),
        })?;

    Ok(Verdict {
        score,
        reason: reason.to_string(),
    })
}
