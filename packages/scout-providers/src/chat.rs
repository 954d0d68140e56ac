use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Asks the chat-completions endpoint to answer `query` for `user` from the retrieved `context`.
///
/// The request is sent once; failures are returned to the caller as is.
pub async fn generate(
	cfg: &scout_config::LlmProviderConfig,
	context: &str,
	query: &str,
	user: &str,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let prompt = render_prompt(cfg.prompt_template(), context, query, user);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": [{ "role": "user", "content": prompt }],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_chat_content(json)
}

/// Fills `{context}`, `{query}` and `{user}` in one pass over `template`. Substituted values are
/// copied verbatim, so placeholders typed by users or found in messages stay literal.
pub fn render_prompt(template: &str, context: &str, query: &str, user: &str) -> String {
	let placeholders = [("{context}", context), ("{query}", query), ("{user}", user)];
	let mut prompt = String::with_capacity(template.len() + context.len() + query.len());
	let mut rest = template;

	while let Some(start) = rest.find('{') {
		prompt.push_str(&rest[..start]);

		let tail = &rest[start..];

		match placeholders.iter().find(|(placeholder, _)| tail.starts_with(placeholder)) {
			Some((placeholder, value)) => {
				prompt.push_str(value);

				rest = &tail[placeholder.len()..];
			},
			None => {
				prompt.push('{');

				rest = &tail[1..];
			},
		}
	}

	prompt.push_str(rest);

	prompt
}

fn parse_chat_content(json: Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Chat response is missing message content.".to_string(),
		})?;

	Ok(content.trim().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_first_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "  The deploy moved to Friday.\n" } },
				{ "message": { "role": "assistant", "content": "ignored" } }
			]
		});
		let answer = parse_chat_content(json).expect("parse failed");
		assert_eq!(answer, "The deploy moved to Friday.");
	}

	#[test]
	fn missing_choices_is_an_error() {
		let json = serde_json::json!({ "error": { "message": "overloaded" } });
		assert!(parse_chat_content(json).is_err());
	}

	#[test]
	fn renders_all_placeholders() {
		let prompt = render_prompt("{user} asks {query} given {context}", "ctx", "q", "Ada");
		assert_eq!(prompt, "Ada asks q given ctx");
	}

	#[test]
	fn context_placeholders_are_not_expanded() {
		let prompt = render_prompt("{context} / {query}", "literal {query}", "q", "Ada");
		assert_eq!(prompt, "literal {query} / q");
	}

	#[test]
	fn placeholders_in_query_and_user_stay_literal() {
		let prompt =
			render_prompt("Q: {query}\nC: {context}", "SECRET CONTEXT", "what is {context}?", "Ada");
		assert_eq!(prompt, "Q: what is {context}?\nC: SECRET CONTEXT");

		let prompt = render_prompt("{user} asks: {query}", "ctx", "release date", "{query}");
		assert_eq!(prompt, "{query} asks: release date");
	}

	#[test]
	fn unknown_braces_are_kept() {
		let prompt = render_prompt("{ {user}} {other} {query", "ctx", "q", "Ada");
		assert_eq!(prompt, "{ Ada} {other} {query");
	}
}
