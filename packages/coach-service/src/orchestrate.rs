//! Top-level state machine: classify → branch → (scope → retrieve → assemble
//! → answer) → recommend → done. One ordered event stream per request; the
//! terminal `done` event is always last, exactly once.

use std::{collections::HashSet, future::Future};

use futures::{SinkExt, StreamExt, channel::mpsc};

use coach_domain::{
	intent::{Classification, SearchIntent, parse_classification},
	prompts::{self, InstructionProfile},
};
use coach_providers::TextStream;
use coach_storage::{models::User, qdrant::IndexKind};

use crate::{
	Citation, Recommendation, ScopeFilter, SearchService, ServiceError, ServiceResult,
	access::AccessScope,
};

/// One element of the ordered per-request event stream.
#[derive(Debug, Clone)]
pub enum SearchEvent {
	Intent { intent: SearchIntent, reasoning: String },
	Citations { citations: Vec<Citation> },
	AnswerChunk { text: String },
	Recommendations { recommendations: Vec<Recommendation> },
	Error { message: String },
	Done { status: &'static str },
}
impl SearchEvent {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Intent { .. } => "intent",
			Self::Citations { .. } => "citations",
			Self::AnswerChunk { .. } => "answer_chunk",
			Self::Recommendations { .. } => "recommendations",
			Self::Error { .. } => "error",
			Self::Done { .. } => "done",
		}
	}

	pub fn data(&self) -> serde_json::Value {
		match self {
			Self::Intent { intent, reasoning } => {
				serde_json::json!({ "intent": intent, "reasoning": reasoning })
			},
			Self::Citations { citations } => serde_json::json!({ "citations": citations }),
			Self::AnswerChunk { text } => serde_json::json!({ "text": text }),
			Self::Recommendations { recommendations } => {
				serde_json::json!({ "recommendations": recommendations })
			},
			Self::Error { message } => serde_json::json!({ "message": message }),
			Self::Done { status } => serde_json::json!({ "status": status }),
		}
	}
}

/// Bounded push channel between the orchestrator and the transport. Sending
/// awaits when the consumer lags (backpressure, never dropped fragments) and
/// fails once the consumer disconnects, which unwinds the whole request.
pub struct EventSink {
	tx: mpsc::Sender<SearchEvent>,
}
impl EventSink {
	pub fn new(tx: mpsc::Sender<SearchEvent>) -> Self {
		Self { tx }
	}

	pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SearchEvent>) {
		let (tx, rx) = mpsc::channel(capacity);

		(Self::new(tx), rx)
	}

	pub async fn emit(&mut self, event: SearchEvent) -> ServiceResult<()> {
		self.tx.send(event).await.map_err(|_| ServiceError::Canceled)
	}
}

/// The two grounded retrieval paths, unified into one handler parameterized
/// by this selection instead of duplicated per intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroundedScope {
	Knowledge,
	History,
}

struct GroundedPath {
	index: IndexKind,
	filter_field: &'static str,
	filter_value: String,
	top_k: u32,
	profile: &'static InstructionProfile,
	content_header: &'static str,
	no_results_guidance: &'static str,
}

impl SearchService {
	/// Runs one search request to completion, emitting the ordered event
	/// stream into `sink`. Always terminates the stream with a single `done`
	/// event unless the consumer has already disconnected.
	pub async fn search(&self, user: &User, query: &str, sink: &mut EventSink) {
		match self.run_search(user, query, sink).await {
			Ok(()) => {
				let _ = sink.emit(SearchEvent::Done { status: "complete" }).await;
			},
			Err(ServiceError::Canceled) => {
				tracing::debug!(user_id = %user.id, "Search consumer disconnected mid-stream.");
			},
			Err(err) => {
				tracing::error!(error = %err, user_id = %user.id, "Search request failed.");

				if sink
					.emit(SearchEvent::Error {
						message: "The search request failed before the answer completed."
							.to_string(),
					})
					.await
					.is_ok()
				{
					let _ = sink.emit(SearchEvent::Done { status: "error" }).await;
				}
			},
		}
	}

	async fn run_search(
		&self,
		user: &User,
		query: &str,
		sink: &mut EventSink,
	) -> ServiceResult<()> {
		let classification = self.classify(query).await;

		sink.emit(SearchEvent::Intent {
			intent: classification.intent,
			reasoning: classification.reasoning,
		})
		.await?;

		match classification.intent {
			SearchIntent::OutOfScope => {
				// Fixed guidance through the normal answer channel; no
				// retrieval is attempted.
				sink.emit(SearchEvent::AnswerChunk {
					text: prompts::OUT_OF_SCOPE_GUIDANCE.to_string(),
				})
				.await
			},
			SearchIntent::GeneralProfessional => {
				sink.emit(SearchEvent::AnswerChunk {
					text: prompts::GENERAL_DISCLAIMER.to_string(),
				})
				.await?;

				let answer = self.synthesize_fallback(query).await?;

				self.forward_answer(answer, sink).await
			},
			SearchIntent::KnowledgeSearch => {
				self.run_grounded(GroundedScope::Knowledge, user, query, sink).await
			},
			SearchIntent::HistorySearch => {
				self.run_grounded(GroundedScope::History, user, query, sink).await
			},
		}
	}

	/// Classification never fails the request: transport errors and malformed
	/// payloads both degrade to the knowledge-search default.
	async fn classify(&self, query: &str) -> Classification {
		match self
			.providers
			.classifier
			.classify(&self.cfg.providers.classifier, prompts::CLASSIFIER_INSTRUCTIONS, query)
			.await
		{
			Ok(value) => parse_classification(&value),
			Err(err) => {
				tracing::warn!(
					error = %err,
					"Intent classification failed; defaulting to knowledge search."
				);

				Classification::default()
			},
		}
	}

	async fn run_grounded(
		&self,
		scope: GroundedScope,
		user: &User,
		query: &str,
		sink: &mut EventSink,
	) -> ServiceResult<()> {
		let path = self.grounded_path(scope, user);
		let asset_scope = self.resolve_scope(scope, &user.id).await?;

		// An empty scope short-circuits retrieval entirely: no index call,
		// guidance instead of an error.
		if asset_scope.is_empty() {
			return sink
				.emit(SearchEvent::AnswerChunk { text: path.no_results_guidance.to_string() })
				.await;
		}

		let mut asset_ids: Vec<String> = asset_scope.iter().cloned().collect();

		asset_ids.sort();

		let filter =
			ScopeFilter { field: path.filter_field, value: path.filter_value.clone(), asset_ids };
		let chunks = self.retrieve(path.index, query, &filter, &asset_scope, path.top_k).await?;

		if chunks.is_empty() {
			return sink
				.emit(SearchEvent::AnswerChunk { text: path.no_results_guidance.to_string() })
				.await;
		}

		let result = match scope {
			GroundedScope::Knowledge => self.assemble_knowledge(chunks).await?,
			GroundedScope::History => self.assemble_history(&user.id, chunks).await?,
		};

		sink.emit(SearchEvent::Citations { citations: result.citations.clone() }).await?;

		let answer =
			self.synthesize(path.profile, path.content_header, query, &result.context).await?;

		self.forward_answer(answer, sink).await?;

		// Already-cited knowledge assets are excluded from recommendations;
		// history citations reference submission assets, which never appear
		// in the knowledge index.
		let cited: HashSet<String> = match scope {
			GroundedScope::Knowledge => {
				result.chunks.iter().map(|chunk| chunk.metadata.asset_id.clone()).collect()
			},
			GroundedScope::History => HashSet::new(),
		};

		if let Some(recommendations) =
			optional_stage("recommendations", self.recommend(user, query, &cited)).await
			&& !recommendations.is_empty()
		{
			sink.emit(SearchEvent::Recommendations { recommendations }).await?;
		}

		Ok(())
	}

	/// Forwards each generated fragment to the sink as soon as it is
	/// produced; output order matches production order.
	async fn forward_answer(
		&self,
		mut answer: TextStream,
		sink: &mut EventSink,
	) -> ServiceResult<()> {
		while let Some(fragment) = answer.next().await {
			let text =
				fragment.map_err(|err| ServiceError::Provider { message: err.to_string() })?;

			sink.emit(SearchEvent::AnswerChunk { text }).await?;
		}

		Ok(())
	}

	fn grounded_path(&self, scope: GroundedScope, user: &User) -> GroundedPath {
		match scope {
			GroundedScope::Knowledge => GroundedPath {
				index: IndexKind::Knowledge,
				filter_field: "company_id",
				filter_value: user.company_id.clone(),
				top_k: self.cfg.search.knowledge_top_k,
				profile: &prompts::KNOWLEDGE_PROFILE,
				content_header: "Source Materials:",
				no_results_guidance: prompts::KNOWLEDGE_NO_RESULTS_GUIDANCE,
			},
			GroundedScope::History => GroundedPath {
				index: IndexKind::Submissions,
				filter_field: "user_id",
				filter_value: user.id.clone(),
				top_k: self.cfg.search.history_top_k,
				profile: &prompts::HISTORY_PROFILE,
				content_header: "Your Submissions & Feedback:",
				no_results_guidance: prompts::HISTORY_NO_RESULTS_GUIDANCE,
			},
		}
	}

	async fn resolve_scope(
		&self,
		scope: GroundedScope,
		user_id: &str,
	) -> ServiceResult<AccessScope> {
		match scope {
			GroundedScope::Knowledge => self.resolve_knowledge_scope(user_id).await,
			GroundedScope::History => self.resolve_history_scope(user_id).await,
		}
	}
}

/// Fallible-optional-stage wrapper: log, continue, emit nothing. Used for
/// every stage whose failure must not abort the primary answer.
pub(crate) async fn optional_stage<T>(
	stage: &str,
	work: impl Future<Output = ServiceResult<T>>,
) -> Option<T> {
	match work.await {
		Ok(value) => Some(value),
		Err(err) => {
			tracing::warn!(error = %err, stage, "Optional stage failed; continuing without it.");

			None
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn event_names_match_the_wire_contract() {
		let events = [
			SearchEvent::Intent {
				intent: SearchIntent::KnowledgeSearch,
				reasoning: String::new(),
			},
			SearchEvent::Citations { citations: Vec::new() },
			SearchEvent::AnswerChunk { text: String::new() },
			SearchEvent::Recommendations { recommendations: Vec::new() },
			SearchEvent::Error { message: String::new() },
			SearchEvent::Done { status: "complete" },
		];
		let names: Vec<&str> = events.iter().map(SearchEvent::name).collect();

		assert_eq!(
			names,
			vec!["intent", "citations", "answer_chunk", "recommendations", "error", "done"]
		);
	}

	#[test]
	fn intent_event_serializes_the_wire_intent_name() {
		let event = SearchEvent::Intent {
			intent: SearchIntent::OutOfScope,
			reasoning: "weather".to_string(),
		};
		let data = event.data();

		assert_eq!(data["intent"], "OUT_OF_SCOPE");
		assert_eq!(data["reasoning"], "weather");
	}
}
