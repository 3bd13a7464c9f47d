use std::time::Duration;

use color_eyre::{Result, eyre};
use futures::{StreamExt, future, stream};
use reqwest::Client;
use serde_json::Value;

use crate::TextStream;

/// Opens a streamed chat completion and returns the answer as a sequence of
/// text fragments. The provider timeout bounds the whole streamed response.
///
/// Fragments arrive as SSE `data:` lines that may be split across network
/// chunks; a carry-over buffer reassembles them before parsing.
pub async fn stream_completion(
	cfg: &coach_config::ProviderConfig,
	instructions: &str,
	content: &str,
	temperature: f32,
) -> Result<TextStream> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": temperature,
		"stream": true,
		"messages": [
			{ "role": "system", "content": instructions },
			{ "role": "user", "content": content },
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let res = res.error_for_status()?;
	let stream = res
		.bytes_stream()
		.scan(String::new(), |buffer, result| {
			let fragments: Vec<Result<String>> = match result {
				Ok(bytes) => {
					buffer.push_str(&String::from_utf8_lossy(&bytes));

					drain_complete_lines(buffer)
						.iter()
						.filter_map(|line| parse_stream_line(line))
						.map(Ok)
						.collect()
				},
				Err(err) => vec![Err(eyre::eyre!("Generation stream failed: {err}."))],
			};

			future::ready(Some(stream::iter(fragments)))
		})
		.flatten();

	Ok(Box::pin(stream))
}

fn drain_complete_lines(buffer: &mut String) -> Vec<String> {
	let mut lines = Vec::new();

	while let Some(position) = buffer.find('\n') {
		let line = buffer[..position].trim().to_string();

		buffer.drain(..=position);

		if !line.is_empty() {
			lines.push(line);
		}
	}

	lines
}

/// Extracts the text delta from one SSE line. Returns `None` for keep-alives,
/// the `[DONE]` sentinel, and deltas without content (role prelude, finish).
fn parse_stream_line(line: &str) -> Option<String> {
	let payload = line.strip_prefix("data:")?.trim();

	if payload.is_empty() || payload == "[DONE]" {
		return None;
	}

	let json: Value = serde_json::from_str(payload).ok()?;
	let delta = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("delta"))
		.and_then(|delta| delta.get("content"))
		.and_then(|content| content.as_str())?;

	if delta.is_empty() {
		return None;
	}

	Some(delta.to_string())
}
