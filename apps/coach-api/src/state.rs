use std::sync::Arc;

use coach_service::SearchService;
use coach_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub async fn new(config: coach_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		// DDL only; the relational data itself is populated out of band.
		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = SearchService::new(config, db, qdrant);

		Ok(Self { service: Arc::new(service) })
	}
}
