//! Joins ranked chunks with relational metadata into an ordered citation list
//! and a labeled context block. The bracketed labels here are a contract with
//! the answer instructions, which tell the model to reference sources by the
//! same index.

use std::collections::HashMap;

use coach_domain::relevance::relevance;
use coach_storage::{
	models::{Asset, SubmissionContext},
	queries,
};

use crate::{ChunkMetadata, RetrievedChunk, SearchService, ServiceResult};

pub(crate) const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// User-facing provenance for one chunk used in an answer. Knowledge
/// citations carry page/timestamp/speaker/table descriptors when present;
/// history citations carry the submission id and any feedback.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Citation {
	pub index: usize,
	pub source_file: String,
	pub source_name: String,
	pub asset_type: String,
	pub chunk_type: String,
	pub relevance: f32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub page: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub end: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub speaker: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub table_title: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub submission_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub feedback_score: Option<i32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub feedback_text: Option<String>,
}

/// Outcome of one retrieval pass. `no_results` holds exactly when `chunks` is
/// empty; `context` and `citations` are meaningful only when it is false.
#[derive(Debug, Clone)]
pub struct SearchResult {
	pub chunks: Vec<RetrievedChunk>,
	pub context: String,
	pub citations: Vec<Citation>,
	pub no_results: bool,
}
impl SearchResult {
	pub fn empty() -> Self {
		Self { chunks: Vec::new(), context: String::new(), citations: Vec::new(), no_results: true }
	}
}

impl SearchService {
	/// Resolves asset display names/types in one batch and builds 1-indexed
	/// citations in retrieval-rank order.
	pub(crate) async fn assemble_knowledge(
		&self,
		chunks: Vec<RetrievedChunk>,
	) -> ServiceResult<SearchResult> {
		if chunks.is_empty() {
			return Ok(SearchResult::empty());
		}

		let mut asset_ids: Vec<String> =
			chunks.iter().map(|chunk| chunk.metadata.asset_id.clone()).collect();

		asset_ids.sort();
		asset_ids.dedup();

		let assets: HashMap<String, Asset> = queries::assets_by_ids(&self.db.pool, &asset_ids)
			.await?
			.into_iter()
			.map(|asset| (asset.id.clone(), asset))
			.collect();
		let mut citations = Vec::with_capacity(chunks.len());
		let mut parts = Vec::with_capacity(chunks.len());

		for (position, chunk) in chunks.iter().enumerate() {
			let index = position + 1;
			let meta = &chunk.metadata;
			let asset = assets.get(&meta.asset_id);
			let source_name = match asset {
				Some(asset) => display_name(&asset.file_name),
				None if meta.source_file.is_empty() => "Unknown".to_string(),
				None => meta.source_file.clone(),
			};
			let asset_type =
				asset.map(|asset| asset.r#type.clone()).unwrap_or_else(|| "unknown".to_string());

			citations.push(Citation {
				index,
				source_file: meta.source_file.clone(),
				source_name: source_name.clone(),
				asset_type,
				chunk_type: meta.chunk_type.clone(),
				relevance: relevance(chunk.distance),
				page: meta.page,
				start: meta.start.clone(),
				end: meta.end.clone(),
				speaker: meta.speaker.clone(),
				table_title: meta.table_title.clone(),
				submission_id: None,
				feedback_score: None,
				feedback_text: None,
			});
			parts.push(format!("{}\n{}", knowledge_label(index, &source_name, meta), chunk.text));
		}

		Ok(SearchResult {
			context: parts.join(CONTEXT_SEPARATOR),
			citations,
			chunks,
			no_results: false,
		})
	}

	/// Resolves feedback and rep titles through one per-user prefetch keyed by
	/// asset id, avoiding a relational lookup per chunk.
	pub(crate) async fn assemble_history(
		&self,
		user_id: &str,
		chunks: Vec<RetrievedChunk>,
	) -> ServiceResult<SearchResult> {
		if chunks.is_empty() {
			return Ok(SearchResult::empty());
		}

		let submissions = queries::submissions_with_feedback(&self.db.pool, user_id).await?;
		let by_asset: HashMap<&str, &SubmissionContext> =
			submissions.iter().map(|submission| (submission.asset_id.as_str(), submission)).collect();
		let mut citations = Vec::with_capacity(chunks.len());
		let mut parts = Vec::with_capacity(chunks.len());

		for (position, chunk) in chunks.iter().enumerate() {
			let index = position + 1;
			let meta = &chunk.metadata;
			let info = by_asset.get(meta.asset_id.as_str()).copied();
			let rep_title = info.and_then(|s| s.rep_title.as_deref()).unwrap_or("Practice");
			let feedback_score = info.and_then(|s| s.feedback_score);
			let feedback_text = feedback_score
				.map(|_| info.and_then(|s| s.feedback_text.clone()).unwrap_or_default());

			citations.push(Citation {
				index,
				source_file: meta.source_file.clone(),
				source_name: format!("Your submission: {rep_title}"),
				asset_type: "submission".to_string(),
				chunk_type: meta.chunk_type.clone(),
				relevance: relevance(chunk.distance),
				page: None,
				start: meta.start.clone(),
				end: meta.end.clone(),
				speaker: None,
				table_title: None,
				submission_id: meta
					.submission_id
					.clone()
					.or_else(|| info.map(|s| s.submission_id.clone())),
				feedback_score,
				feedback_text: feedback_text.clone(),
			});

			let mut part = format!("{}\n{}", history_label(index, rep_title, meta), chunk.text);

			if let Some(score) = feedback_score {
				part.push_str(&format!(
					"\nFeedback (Score {score}/10): {}",
					feedback_text.unwrap_or_default()
				));
			}

			parts.push(part);
		}

		Ok(SearchResult {
			context: parts.join(CONTEXT_SEPARATOR),
			citations,
			chunks,
			no_results: false,
		})
	}
}

fn display_name(file_name: &str) -> String {
	file_name.strip_suffix(".json").unwrap_or(file_name).to_string()
}

pub(crate) fn knowledge_label(index: usize, source_name: &str, meta: &ChunkMetadata) -> String {
	let mut label = format!("[Source {index}: {source_name}");

	if let Some(page) = meta.page {
		label.push_str(&format!(", Page {page}"));
	}
	if let Some(start) = meta.start.as_deref() {
		label.push_str(&format!(", {start}-{}", meta.end.as_deref().unwrap_or("")));
	}
	if let Some(speaker) = meta.speaker.as_deref() {
		label.push_str(&format!(", {speaker}"));
	}

	label.push(']');

	label
}

pub(crate) fn history_label(index: usize, rep_title: &str, meta: &ChunkMetadata) -> String {
	let mut label = format!("[Submission {index}: {rep_title}");

	if let Some(start) = meta.start.as_deref() {
		label.push_str(&format!(", {start}-{}", meta.end.as_deref().unwrap_or("")));
	}

	label.push(']');

	label
}
