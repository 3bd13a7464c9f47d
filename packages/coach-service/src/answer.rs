//! Thin wrapper over the generation capability. The heavy lifting is the
//! instruction profiles in `coach-domain` and the streaming provider.

use coach_domain::prompts::{self, InstructionProfile};
use coach_providers::TextStream;

use crate::{SearchService, ServiceError, ServiceResult};

impl SearchService {
	/// Streams a grounded answer from an instruction profile plus assembled
	/// context. The returned stream is lazy, forward-only, and finite.
	pub(crate) async fn synthesize(
		&self,
		profile: &InstructionProfile,
		content_header: &str,
		query: &str,
		context: &str,
	) -> ServiceResult<TextStream> {
		let content = format!("Question: {query}\n\n{content_header}\n{context}");

		self.providers
			.generation
			.stream(&self.cfg.providers.generation, profile.instructions, &content, profile.temperature)
			.await
			.map_err(|err| ServiceError::Provider { message: err.to_string() })
	}

	/// Streams the ungrounded general-professional answer. The fixed
	/// disclaimer is emitted by the orchestrator before the first fragment.
	pub(crate) async fn synthesize_fallback(&self, query: &str) -> ServiceResult<TextStream> {
		let profile = prompts::FALLBACK_PROFILE;

		self.providers
			.generation
			.stream(&self.cfg.providers.generation, profile.instructions, query, profile.temperature)
			.await
			.map_err(|err| ServiceError::Provider { message: err.to_string() })
	}
}
