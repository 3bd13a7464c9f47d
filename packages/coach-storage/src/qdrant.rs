use crate::Result;

/// The two logical indexes served by the vector store. Population is owned by
/// the offline ingestion process; this service only queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
	Knowledge,
	Submissions,
}

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub knowledge_collection: String,
	pub submissions_collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &coach_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			knowledge_collection: cfg.knowledge_collection.clone(),
			submissions_collection: cfg.submissions_collection.clone(),
			vector_dim: cfg.vector_dim,
		})
	}

	pub fn collection(&self, kind: IndexKind) -> &str {
		match kind {
			IndexKind::Knowledge => &self.knowledge_collection,
			IndexKind::Submissions => &self.submissions_collection,
		}
	}
}
