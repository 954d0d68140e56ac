use serde::{Deserialize, Serialize};

use crate::{AnswerGenerator, Deadline, EnrichedContextRecord, Result, SimilarityMatch, Stage};

pub const NO_MATCH_ANSWER: &str = "Unable to find conversations related to your query.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub answer: String,
	pub context: Vec<EnrichedContextRecord>,
}
impl SearchResult {
	pub fn no_match() -> Self {
		Self { answer: NO_MATCH_ANSWER.to_string(), context: Vec::new() }
	}

	pub fn is_no_match(&self) -> bool {
		self.context.is_empty() && self.answer == NO_MATCH_ANSWER
	}
}

/// Newline-joined message texts, in match order.
pub fn build_context(matches: &[&SimilarityMatch]) -> String {
	matches.iter().map(|item| item.document.as_str()).collect::<Vec<_>>().join("\n")
}

pub async fn compose(
	generator: &dyn AnswerGenerator,
	query: &str,
	user_name: &str,
	records: Vec<EnrichedContextRecord>,
	context_text: &str,
	generate_answer: bool,
	deadline: Deadline,
) -> Result<SearchResult> {
	if records.is_empty() {
		return Ok(SearchResult::no_match());
	}
	if !generate_answer {
		return Ok(SearchResult { answer: String::new(), context: records });
	}

	let answer = deadline
		.run(
			Stage::Generation,
			"generate an answer",
			generator.generate(context_text, query, user_name),
		)
		.await?;

	Ok(SearchResult { answer, context: records })
}
