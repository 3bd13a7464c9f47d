use std::collections::{HashMap, HashSet};

use qdrant_client::qdrant::{
	Condition, Filter, Query, QueryPointsBuilder, ScoredPoint, Value, value::Kind,
};
use tracing::warn;

use coach_storage::qdrant::{IndexKind, QdrantStore};

use crate::{BoxFuture, SearchService, ServiceError, ServiceResult, VectorIndex};

/// Provenance carried by every retrieval unit. Populated by the offline
/// ingestion process as index payload; optional fields depend on the asset
/// type (pages for pdf, timestamps for video/audio, speakers for transcripts).
#[derive(Debug, Clone, Default)]
pub struct ChunkMetadata {
	pub asset_id: String,
	pub chunk_type: String,
	pub source_file: String,
	pub page: Option<i64>,
	pub start: Option<String>,
	pub end: Option<String>,
	pub speaker: Option<String>,
	pub table_title: Option<String>,
	pub submission_id: Option<String>,
}

/// One ranked retrieval unit. Distance is normalized cosine distance in
/// [0, 2]; lower is more similar.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
	pub text: String,
	pub distance: f32,
	pub metadata: ChunkMetadata,
}

/// Conjunctive visibility filter for one index query: an equality constraint
/// (company for knowledge, user for submissions) AND membership in the
/// resolved per-user asset scope.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
	pub field: &'static str,
	pub value: String,
	pub asset_ids: Vec<String>,
}

/// The production `VectorIndex`, backed by Qdrant.
pub struct QdrantIndex {
	store: QdrantStore,
}
impl QdrantIndex {
	pub fn new(store: QdrantStore) -> Self {
		Self { store }
	}
}
impl VectorIndex for QdrantIndex {
	fn query<'a>(
		&'a self,
		index: IndexKind,
		vector: Vec<f32>,
		filter: &'a ScopeFilter,
		limit: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RetrievedChunk>>> {
		Box::pin(async move {
			let conditions = Filter::all([
				Condition::matches(filter.field, filter.value.clone()),
				Condition::matches("asset_id", filter.asset_ids.clone()),
			]);
			let search = QueryPointsBuilder::new(self.store.collection(index))
				.query(Query::new_nearest(vector))
				.filter(conditions)
				.limit(limit)
				.with_payload(true);
			let response = self.store.client.query(search).await?;

			Ok(response.result.iter().filter_map(point_to_chunk).collect())
		})
	}
}

impl SearchService {
	pub(crate) async fn embed_query(&self, query: &str) -> ServiceResult<Vec<f32>> {
		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, std::slice::from_ref(&query.to_string()))
			.await?;
		let vector = embeddings.into_iter().next().ok_or_else(|| ServiceError::Provider {
			message: "Embedding provider returned no vectors.".to_string(),
		})?;

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(ServiceError::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vector)
	}

	/// Scope-and-tenant-filtered similarity search: embed the query, run the
	/// filtered index query, then re-check every hit against the resolved
	/// scope so the isolation invariant holds even against a misbehaving
	/// index.
	pub(crate) async fn retrieve(
		&self,
		index: IndexKind,
		query: &str,
		filter: &ScopeFilter,
		scope: &HashSet<String>,
		top_k: u32,
	) -> ServiceResult<Vec<RetrievedChunk>> {
		let vector = self.embed_query(query).await?;
		let hits = self
			.index
			.query(index, vector, filter, u64::from(top_k))
			.await
			.map_err(|err| ServiceError::Index { message: err.to_string() })?;

		Ok(rank_chunks(hits, scope, top_k as usize))
	}
}

/// Drops out-of-scope hits, orders by ascending distance, and applies the
/// result cap.
pub(crate) fn rank_chunks(
	hits: Vec<RetrievedChunk>,
	scope: &HashSet<String>,
	top_k: usize,
) -> Vec<RetrievedChunk> {
	let mut chunks: Vec<RetrievedChunk> = hits
		.into_iter()
		.filter(|chunk| {
			if scope.contains(&chunk.metadata.asset_id) {
				true
			} else {
				warn!(
					asset_id = %chunk.metadata.asset_id,
					"Dropped index hit outside the resolved access scope."
				);

				false
			}
		})
		.collect();

	chunks.sort_by(|a, b| {
		a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
	});
	chunks.truncate(top_k);

	chunks
}

fn point_to_chunk(point: &ScoredPoint) -> Option<RetrievedChunk> {
	let Some(text) = payload_str(&point.payload, "text") else {
		warn!("Index hit is missing its text payload.");

		return None;
	};
	let Some(asset_id) = payload_str(&point.payload, "asset_id") else {
		warn!("Index hit is missing its asset_id payload.");

		return None;
	};
	let metadata = ChunkMetadata {
		asset_id,
		chunk_type: payload_str(&point.payload, "chunk_type").unwrap_or_default(),
		source_file: payload_str(&point.payload, "source_file").unwrap_or_default(),
		page: payload_i64(&point.payload, "page"),
		start: payload_str(&point.payload, "start"),
		end: payload_str(&point.payload, "end"),
		speaker: payload_str(&point.payload, "speaker"),
		table_title: payload_str(&point.payload, "table_title"),
		submission_id: payload_str(&point.payload, "submission_id"),
	};

	// Qdrant reports cosine similarity; downstream works in cosine distance.
	Some(RetrievedChunk { text, distance: 1.0 - point.score, metadata })
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;
	match &value.kind {
		Some(Kind::StringValue(text)) if !text.is_empty() => Some(text.clone()),
		_ => None,
	}
}

fn payload_i64(payload: &HashMap<String, Value>, key: &str) -> Option<i64> {
	let value = payload.get(key)?;
	match &value.kind {
		Some(Kind::IntegerValue(value)) => Some(*value),
		Some(Kind::DoubleValue(value)) if value.fract() == 0.0 => Some(*value as i64),
		_ => None,
	}
}
