use serde::{Deserialize, Serialize};

use crate::{
	Deadline, Error, Result, ScoutService, SearchResult, SimilarityMatch, answer, enrichment,
	relevance, retrieval, scope,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub user_id: String,
	/// Display name of the requester, handed to the language model.
	pub user_name: String,
	pub query: String,
	#[serde(default = "default_generate_answer")]
	pub generate_answer: bool,
}

impl ScoutService {
	/// Runs one search under the configured `search.deadline_ms` budget.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResult> {
		let deadline = Deadline::from_millis(self.cfg.search.deadline_ms);

		self.search_with_deadline(req, deadline).await
	}

	pub async fn search_with_deadline(
		&self,
		req: SearchRequest,
		deadline: Deadline,
	) -> Result<SearchResult> {
		validate_request(&req)?;

		let user_id = req.user_id.trim();
		let query = req.query.trim();
		let scope =
			scope::resolve_channel_scope(self.providers.identity.as_ref(), user_id, deadline)
				.await?;
		let matches = retrieval::query_scoped(
			self.providers.index.as_ref(),
			query,
			self.cfg.search.result_limit,
			&scope,
			deadline,
		)
		.await?;
		let surviving = relevance::relevant_indices(&matches, self.cfg.search.max_distance);

		tracing::debug!(
			max_distance = self.cfg.search.max_distance,
			surviving = ?surviving,
			"Relevance filter applied."
		);

		if surviving.is_empty() {
			tracing::warn!(
				user_id,
				channels = scope.len(),
				matches = matches.len(),
				"No sufficiently relevant conversations found."
			);

			return Ok(SearchResult::no_match());
		}

		let relevant: Vec<&SimilarityMatch> = surviving.iter().map(|&i| &matches[i]).collect();
		let context_text = answer::build_context(&relevant);
		let records = enrichment::enrich_matches(
			self.providers.identity.as_ref(),
			&self.cfg.enrichment,
			&relevant,
			deadline,
		)
		.await?;
		let result = answer::compose(
			self.providers.generator.as_ref(),
			query,
			&req.user_name,
			records,
			&context_text,
			req.generate_answer,
			deadline,
		)
		.await?;

		tracing::info!(
			user_id,
			context = result.context.len(),
			generated = req.generate_answer,
			"Search completed."
		);

		Ok(result)
	}
}

fn validate_request(req: &SearchRequest) -> Result<()> {
	if req.user_id.trim().is_empty() {
		return Err(Error::InvalidRequest { message: "user_id must be non-empty.".to_string() });
	}
	if req.query.trim().is_empty() {
		return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
	}

	Ok(())
}

fn default_generate_answer() -> bool {
	true
}
