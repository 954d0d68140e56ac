pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	ScopeResolution,
	Retrieval,
	Enrichment,
	Generation,
}
impl Stage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ScopeResolution => "scope_resolution",
			Self::Retrieval => "retrieval",
			Self::Enrichment => "enrichment",
			Self::Generation => "generation",
		}
	}

	pub(crate) fn error(self, message: String) -> Error {
		match self {
			Self::ScopeResolution => Error::ScopeResolution { message },
			Self::Retrieval => Error::Retrieval { message },
			Self::Enrichment => Error::Enrichment { message },
			Self::Generation => Error::Generation { message },
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Scope resolution error: {message}")]
	ScopeResolution { message: String },
	#[error("Retrieval error: {message}")]
	Retrieval { message: String },
	#[error("Enrichment error: {message}")]
	Enrichment { message: String },
	#[error("Generation error: {message}")]
	Generation { message: String },
}
impl Error {
	pub fn stage(&self) -> Option<Stage> {
		match self {
			Self::InvalidRequest { .. } => None,
			Self::ScopeResolution { .. } => Some(Stage::ScopeResolution),
			Self::Retrieval { .. } => Some(Stage::Retrieval),
			Self::Enrichment { .. } => Some(Stage::Enrichment),
			Self::Generation { .. } => Some(Stage::Generation),
		}
	}

	/// Message suitable for showing to the person who ran the search.
	pub fn user_message(&self) -> &'static str {
		match self {
			Self::InvalidRequest { .. } => "The search request is missing a user or a query.",
			Self::ScopeResolution { .. } =>
				"Something went wrong while resolving the channels you can access!",
			Self::Retrieval { .. } =>
				"Something went wrong while fetching data from the vector index!",
			Self::Enrichment { .. } =>
				"Something went wrong while fetching details for the matching conversations!",
			Self::Generation { .. } => "Something went wrong while getting response from LLM!",
		}
	}
}
