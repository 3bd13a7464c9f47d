use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Runs the intent classifier at zero temperature with a structured JSON
/// response, returning the raw classification object. The caller decides how
/// to recover from malformed payloads.
pub async fn classify(
	cfg: &coach_config::ProviderConfig,
	instructions: &str,
	query: &str,
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": 0,
		"response_format": { "type": "json_object" },
		"messages": [
			{ "role": "system", "content": instructions },
			{ "role": "user", "content": query },
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_classifier_json(json)
}

fn parse_classifier_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		let parsed: Value = serde_json::from_str(content)
			.map_err(|_| eyre::eyre!("Classifier content is not valid JSON."))?;

		return Ok(parsed);
	}

	if json.is_object() {
		return Ok(json);
	}

	Err(eyre::eyre!("Classifier response is missing JSON content."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content_json() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"intent\": \"OUT_OF_SCOPE\", \"reasoning\": \"weather\"}" } }
			]
		});
		let parsed = parse_classifier_json(json).expect("parse failed");

		assert_eq!(parsed["intent"], "OUT_OF_SCOPE");
		assert_eq!(parsed["reasoning"], "weather");
	}

	#[test]
	fn rejects_non_json_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "KNOWLEDGE_SEARCH" } }
			]
		});

		assert!(parse_classifier_json(json).is_err());
	}

	#[test]
	fn passes_through_bare_objects() {
		let json = serde_json::json!({ "intent": "HISTORY_SEARCH" });
		let parsed = parse_classifier_json(json).expect("parse failed");

		assert_eq!(parsed["intent"], "HISTORY_SEARCH");
	}
}
