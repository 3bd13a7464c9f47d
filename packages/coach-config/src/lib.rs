mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Postgres, ProviderConfig, Providers, Qdrant, Search, Service,
	Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.knowledge_collection.trim().is_empty()
		|| cfg.storage.qdrant.submissions_collection.trim().is_empty()
	{
		return Err(Error::Validation {
			message: "storage.qdrant collection names must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.knowledge_collection == cfg.storage.qdrant.submissions_collection {
		return Err(Error::Validation {
			message: "storage.qdrant.knowledge_collection and storage.qdrant.submissions_collection must differ."
				.to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.embedding.max_input_chars == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.max_input_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.search.knowledge_top_k == 0 {
		return Err(Error::Validation {
			message: "search.knowledge_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.search.history_top_k == 0 {
		return Err(Error::Validation {
			message: "search.history_top_k must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("classifier", &cfg.providers.classifier.api_key),
		("generation", &cfg.providers.generation.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}
