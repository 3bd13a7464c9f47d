use coach_domain::{
	intent::{SearchIntent, parse_classification},
	prompts,
	relevance::relevance,
};

#[test]
fn intents_round_trip_their_wire_names() {
	for intent in [
		SearchIntent::KnowledgeSearch,
		SearchIntent::HistorySearch,
		SearchIntent::GeneralProfessional,
		SearchIntent::OutOfScope,
	] {
		assert_eq!(SearchIntent::parse(intent.as_str()), Some(intent));
	}

	assert_eq!(SearchIntent::parse("knowledge_search"), None);
}

#[test]
fn intent_serializes_as_screaming_snake_case() {
	let json = serde_json::to_string(&SearchIntent::OutOfScope).expect("Failed to serialize.");

	assert_eq!(json, "\"OUT_OF_SCOPE\"");
}

#[test]
fn classification_recovers_from_malformed_payloads() {
	let parsed = parse_classification(&serde_json::json!({ "intent": 42 }));

	assert_eq!(parsed.intent, SearchIntent::KnowledgeSearch);

	let parsed = parse_classification(&serde_json::json!(null));

	assert_eq!(parsed.intent, SearchIntent::KnowledgeSearch);
}

#[test]
fn relevance_matches_the_round_one_minus_distance_contract() {
	let cases = [
		(0.0_f32, 1.0_f32),
		(0.25, 0.75),
		(0.333_3, 0.667),
		(1.0, 0.0),
		(1.5, -0.5),
		(2.0, -1.0),
	];

	for (distance, expected) in cases {
		let actual = relevance(distance);

		assert!(
			(actual - expected).abs() < 1e-6,
			"relevance({distance}) = {actual}, expected {expected}"
		);
	}
}

#[test]
fn grounded_profiles_reference_their_label_notation() {
	assert!(prompts::KNOWLEDGE_PROFILE.instructions.contains("[Source N]"));
	assert!(prompts::HISTORY_PROFILE.instructions.contains("[Submission N]"));
	assert!(prompts::GENERAL_DISCLAIMER.starts_with("**Note:**"));
}

#[test]
fn grounded_profiles_run_near_zero_temperature() {
	assert!(prompts::KNOWLEDGE_PROFILE.temperature <= 0.2);
	assert!(prompts::HISTORY_PROFILE.temperature <= 0.2);
	assert!(prompts::FALLBACK_PROFILE.temperature > prompts::KNOWLEDGE_PROFILE.temperature);
}
