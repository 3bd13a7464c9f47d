//! Per-user visibility scopes. These sets are the sole basis for retrieval
//! visibility: a chunk outside the resolved scope never reaches a caller,
//! regardless of query relevance.

use std::collections::HashSet;

use coach_storage::queries;

use crate::{SearchService, ServiceResult};

/// The asset ids a user may retrieve from for one search type, computed fresh
/// per request and discarded with it.
pub type AccessScope = HashSet<String>;

impl SearchService {
	/// Union of asset ids referenced by watch-type reps across every play
	/// assigned to the user. Assignment status (assigned, completed, locked)
	/// is not filtered; reps without a linked asset are excluded.
	pub async fn resolve_knowledge_scope(&self, user_id: &str) -> ServiceResult<AccessScope> {
		Ok(queries::knowledge_asset_ids(&self.db.pool, user_id).await?.into_iter().collect())
	}

	/// Asset ids of the user's own submissions. History access is strictly
	/// first-person; no other user's submissions ever enter this set.
	pub async fn resolve_history_scope(&self, user_id: &str) -> ServiceResult<AccessScope> {
		Ok(queries::submission_asset_ids(&self.db.pool, user_id).await?.into_iter().collect())
	}
}
