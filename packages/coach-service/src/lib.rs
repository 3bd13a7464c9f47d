pub mod access;
pub mod answer;
pub mod context;
pub mod directory;
pub mod orchestrate;
pub mod recommend;
pub mod retrieval;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use coach_config::{Config, EmbeddingProviderConfig, ProviderConfig};
use coach_providers::{TextStream, classify, embedding, generation};
use coach_storage::{db::Db, models::User, qdrant::QdrantStore};

pub use access::AccessScope;
pub use coach_storage::qdrant::IndexKind;
pub use context::{Citation, SearchResult};
pub use directory::{AssignedPlaySummary, CompanySummary, UserDetail, UserSummary};
pub use orchestrate::{EventSink, SearchEvent};
pub use recommend::Recommendation;
pub use retrieval::{ChunkMetadata, QdrantIndex, RetrievedChunk, ScopeFilter};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Embeds query text into fixed-dimension vectors.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

/// Classifies a raw query into a structured intent object.
pub trait ClassifierProvider
where
	Self: Send + Sync,
{
	fn classify<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		instructions: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

/// Streams generated answer text for an instruction profile plus content.
pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn stream<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		instructions: &'a str,
		content: &'a str,
		temperature: f32,
	) -> BoxFuture<'a, color_eyre::Result<TextStream>>;
}

/// Similarity search against one named collection under a conjunctive
/// visibility filter. Injected so tests can substitute fakes for the real
/// Qdrant-backed implementation.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn query<'a>(
		&'a self,
		index: IndexKind,
		vector: Vec<f32>,
		filter: &'a ScopeFilter,
		limit: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RetrievedChunk>>>;
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Index error: {message}")]
	Index { message: String },
	#[error("Consumer disconnected before the stream completed.")]
	Canceled,
}
impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<coach_storage::Error> for ServiceError {
	fn from(err: coach_storage::Error) -> Self {
		match err {
			coach_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			coach_storage::Error::NotFound(message) => Self::NotFound { message },
			coach_storage::Error::Qdrant(inner) => Self::Index { message: inner.to_string() },
		}
	}
}
impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub classifier: Arc<dyn ClassifierProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl ClassifierProvider for DefaultProviders {
	fn classify<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		instructions: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(classify::classify(cfg, instructions, query))
	}
}

impl GenerationProvider for DefaultProviders {
	fn stream<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		instructions: &'a str,
		content: &'a str,
		temperature: f32,
	) -> BoxFuture<'a, color_eyre::Result<TextStream>> {
		Box::pin(generation::stream_completion(cfg, instructions, content, temperature))
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		classifier: Arc<dyn ClassifierProvider>,
		generation: Arc<dyn GenerationProvider>,
	) -> Self {
		Self { embedding, classifier, generation }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { embedding: provider.clone(), classifier: provider.clone(), generation: provider }
	}
}

/// Query-time search pipeline over externally-populated stores. Holds no
/// request state; every search runs against fresh, request-scoped data and
/// the stores are read-only at query time.
pub struct SearchService {
	pub cfg: Config,
	pub db: Db,
	pub index: Arc<dyn VectorIndex>,
	pub providers: Providers,
}
impl SearchService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self {
			cfg,
			db,
			index: Arc::new(QdrantIndex::new(qdrant)),
			providers: Providers::default(),
		}
	}

	pub fn with_collaborators(
		cfg: Config,
		db: Db,
		index: Arc<dyn VectorIndex>,
		providers: Providers,
	) -> Self {
		Self { cfg, db, index, providers }
	}

	pub async fn fetch_user(&self, user_id: &str) -> ServiceResult<User> {
		coach_storage::queries::fetch_user(&self.db.pool, user_id)
			.await?
			.ok_or_else(|| ServiceError::NotFound { message: format!("Unknown user {user_id}.") })
	}
}
