use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Runs one chat completion and returns the assistant text.
pub async fn generate(cfg: &tactile_config::LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_generation_response(json)
}

fn parse_generation_response(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Generation response is missing message content.".to_string(),
		})?;
	let trimmed = content.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidResponse {
			message: "Generation response content is empty.".to_string(),
		});
	}

	Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_first_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "  How heavy is Cherry MX Red?\n" } }
			]
		});
		let parsed = parse_generation_response(json).expect("parse failed");

		assert_eq!(parsed, "How heavy is Cherry MX Red?");
	}

	#[test]
	fn rejects_missing_or_blank_content() {
		let missing = serde_json::json!({ "choices": [] });
		let blank = serde_json::json!({ "choices": [{ "message": { "content": "   " } }] });

		assert!(matches!(parse_generation_response(missing), Err(Error::InvalidResponse { .. })));
		assert!(matches!(parse_generation_response(blank), Err(Error::InvalidResponse { .. })));
	}
}
