//! Rewrites follow-up questions into standalone queries using the conversation history.
//!
//! The rewrite is best effort. Any failure, timeout or empty output falls back to the raw query
//! and records why, so retrieval always has something to work with.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, GenerationProvider};
use tactile_config::{Contextualizer, LlmProviderConfig};

const REWRITE_SYSTEM_PROMPT: &str = "You rewrite the user's latest message into a standalone \
search query about mechanical keyboard switches. Resolve pronouns and references such as \"it\", \
\"that one\" or \"the second switch\" using the conversation. Keep every switch name exactly as \
written. Do not answer the question. Reply with the rewritten query only, on a single line.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
	User,
	Assistant,
}
impl TurnRole {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::User => "user",
			Self::Assistant => "assistant",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
	pub role: TurnRole,
	pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextualizedQuery {
	pub query: String,
	pub rewritten: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fallback_reason: Option<String>,
}
impl ContextualizedQuery {
	fn unchanged(query: &str) -> Self {
		Self { query: query.to_string(), rewritten: false, fallback_reason: None }
	}

	fn fallback(query: &str, reason: String) -> Self {
		Self { query: query.to_string(), rewritten: false, fallback_reason: Some(reason) }
	}
}

pub async fn contextualize_query(
	generator: &dyn GenerationProvider,
	llm_cfg: &LlmProviderConfig,
	cfg: &Contextualizer,
	query: &str,
	history: &[ConversationTurn],
) -> ContextualizedQuery {
	let recent = recent_turns(history, cfg.max_history_turns as usize);

	if recent.is_empty() {
		return ContextualizedQuery::unchanged(query);
	}

	let messages = build_rewrite_messages(query, &recent);
	let rewrite = match tokio::time::timeout(
		Duration::from_millis(cfg.timeout_ms),
		generator.generate(llm_cfg, &messages),
	)
	.await
	{
		Ok(result) => result,
		Err(_) => Err(Error::Timeout {
			message: format!("Query rewrite exceeded {} ms.", cfg.timeout_ms),
		}),
	};

	match rewrite {
		Ok(text) => match clean_rewrite(&text) {
			Some(standalone) => {
				tracing::debug!(original = %query, standalone = %standalone, "Query rewritten.");

				ContextualizedQuery { query: standalone, rewritten: true, fallback_reason: None }
			},
			None => {
				tracing::warn!("Query rewrite returned empty text. Using the original query.");

				ContextualizedQuery::fallback(query, "Query rewrite returned empty text.".to_string())
			},
		},
		Err(err) => {
			tracing::warn!(error = %err, "Query rewrite failed. Using the original query.");

			ContextualizedQuery::fallback(query, format!("Query rewrite failed: {err}"))
		},
	}
}

/// The last `max_turns` turns that carry text, oldest first.
fn recent_turns(history: &[ConversationTurn], max_turns: usize) -> Vec<&ConversationTurn> {
	let usable: Vec<&ConversationTurn> =
		history.iter().filter(|turn| !turn.content.trim().is_empty()).collect();
	let skip = usable.len().saturating_sub(max_turns);

	usable.into_iter().skip(skip).collect()
}

fn build_rewrite_messages(query: &str, recent: &[&ConversationTurn]) -> Vec<Value> {
	let transcript = recent
		.iter()
		.map(|turn| format!("{}: {}", turn.role.as_str(), turn.content.trim()))
		.collect::<Vec<_>>()
		.join("\n");
	let user_prompt =
		format!("Conversation so far:\n{transcript}\n\nLatest message:\n{}", query.trim());

	vec![
		serde_json::json!({ "role": "system", "content": REWRITE_SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

fn clean_rewrite(text: &str) -> Option<String> {
	let line = text.lines().map(str::trim).find(|line| !line.is_empty())?;
	let line = line
		.strip_prefix("Standalone query:")
		.or_else(|| line.strip_prefix("Query:"))
		.unwrap_or(line)
		.trim();
	let line = line.trim_matches(|ch| matches!(ch, '"' | '\'' | '`')).trim();

	if line.is_empty() { None } else { Some(line.to_string()) }
}
