use serde_json::Value;

/// The four routes a query can take. History access is strictly first-person:
/// a query naming another person's content classifies as knowledge search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchIntent {
	KnowledgeSearch,
	HistorySearch,
	GeneralProfessional,
	OutOfScope,
}
impl SearchIntent {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::KnowledgeSearch => "KNOWLEDGE_SEARCH",
			Self::HistorySearch => "HISTORY_SEARCH",
			Self::GeneralProfessional => "GENERAL_PROFESSIONAL",
			Self::OutOfScope => "OUT_OF_SCOPE",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"KNOWLEDGE_SEARCH" => Some(Self::KnowledgeSearch),
			"HISTORY_SEARCH" => Some(Self::HistorySearch),
			"GENERAL_PROFESSIONAL" => Some(Self::GeneralProfessional),
			"OUT_OF_SCOPE" => Some(Self::OutOfScope),
			_ => None,
		}
	}
}

#[derive(Debug, Clone)]
pub struct Classification {
	pub intent: SearchIntent,
	pub reasoning: String,
}
impl Default for Classification {
	fn default() -> Self {
		Self { intent: SearchIntent::KnowledgeSearch, reasoning: String::new() }
	}
}

/// Classification never fails a request: a missing or unknown intent field
/// falls back to knowledge search.
pub fn parse_classification(value: &Value) -> Classification {
	let intent = value
		.get("intent")
		.and_then(Value::as_str)
		.and_then(SearchIntent::parse)
		.unwrap_or(SearchIntent::KnowledgeSearch);
	let reasoning =
		value.get("reasoning").and_then(Value::as_str).unwrap_or_default().to_string();

	Classification { intent, reasoning }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_known_intents() {
		let value = serde_json::json!({
			"intent": "HISTORY_SEARCH",
			"reasoning": "First-person query about a past pitch."
		});
		let parsed = parse_classification(&value);

		assert_eq!(parsed.intent, SearchIntent::HistorySearch);
		assert_eq!(parsed.reasoning, "First-person query about a past pitch.");
	}

	#[test]
	fn missing_intent_defaults_to_knowledge_search() {
		let value = serde_json::json!({ "reasoning": "no intent field" });
		let parsed = parse_classification(&value);

		assert_eq!(parsed.intent, SearchIntent::KnowledgeSearch);
	}

	#[test]
	fn unknown_intent_defaults_to_knowledge_search() {
		let value = serde_json::json!({ "intent": "SOMETHING_ELSE" });
		let parsed = parse_classification(&value);

		assert_eq!(parsed.intent, SearchIntent::KnowledgeSearch);
		assert!(parsed.reasoning.is_empty());
	}

	#[test]
	fn non_object_defaults_to_knowledge_search() {
		let parsed = parse_classification(&Value::String("OUT_OF_SCOPE".to_string()));

		assert_eq!(parsed.intent, SearchIntent::KnowledgeSearch);
	}
}
