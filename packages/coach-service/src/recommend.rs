//! Best-effort related-content suggestions from the knowledge index. Any
//! failure here is isolated by the orchestrator's optional-stage wrapper and
//! never disturbs an already-emitted answer stream.

use std::collections::HashSet;

use tracing::warn;

use coach_domain::relevance::relevance;
use coach_storage::{models::User, qdrant::IndexKind, queries};

use crate::{ScopeFilter, SearchService, ServiceError, ServiceResult};

/// Candidates fetched from the index before dedup and relational resolution.
const FETCH_WIDTH: u64 = 5;
const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Recommendation {
	pub asset_id: String,
	pub asset_type: String,
	pub rep_title: String,
	pub play_title: String,
	pub file_name: String,
	pub relevance: f32,
}

impl SearchService {
	/// Up to three related assets, deduplicated by asset id, drawn from the
	/// user's knowledge scope minus `exclude`. Candidates without a
	/// resolvable asset or a linked rep are skipped without counting against
	/// the cap.
	pub async fn recommend(
		&self,
		user: &User,
		query: &str,
		exclude: &HashSet<String>,
	) -> ServiceResult<Vec<Recommendation>> {
		let scope = self.resolve_knowledge_scope(&user.id).await?;
		let mut search_ids: Vec<String> =
			scope.iter().filter(|id| !exclude.contains(*id)).cloned().collect();

		if search_ids.is_empty() {
			return Ok(Vec::new());
		}

		search_ids.sort();

		let allowed: HashSet<String> = search_ids.iter().cloned().collect();
		let vector = self.embed_query(query).await?;
		let filter = ScopeFilter {
			field: "company_id",
			value: user.company_id.clone(),
			asset_ids: search_ids,
		};
		let hits = self
			.index
			.query(IndexKind::Knowledge, vector, &filter, FETCH_WIDTH)
			.await
			.map_err(|err| ServiceError::Index { message: err.to_string() })?;
		let mut seen = HashSet::new();
		let mut recommendations = Vec::new();

		for hit in hits {
			let asset_id = hit.metadata.asset_id.clone();

			if !allowed.contains(&asset_id) {
				warn!(asset_id = %asset_id, "Dropped recommendation candidate outside the search scope.");

				continue;
			}
			if !seen.insert(asset_id.clone()) {
				continue;
			}

			let Some(asset) = queries::asset_by_id(&self.db.pool, &asset_id).await? else {
				continue;
			};
			let Some(rep) = queries::rep_for_asset(&self.db.pool, &asset_id).await? else {
				continue;
			};
			let play_title = queries::play_by_id(&self.db.pool, &rep.play_id)
				.await?
				.map(|play| play.title)
				.unwrap_or_default();

			recommendations.push(Recommendation {
				asset_id,
				asset_type: asset.r#type,
				rep_title: rep.prompt_title.unwrap_or_default(),
				play_title,
				file_name: asset.file_name,
				relevance: relevance(hit.distance),
			});

			if recommendations.len() >= MAX_RECOMMENDATIONS {
				break;
			}
		}

		Ok(recommendations)
	}
}
