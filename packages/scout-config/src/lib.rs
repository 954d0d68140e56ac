mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DEFAULT_PROMPT_TEMPLATE, EmbeddingProviderConfig, Enrichment, LlmProviderConfig,
	Mattermost, Providers, Qdrant, Search, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.search.result_limit == 0 {
		return Err(Error::Validation {
			message: "search.result_limit must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.max_distance.is_finite() {
		return Err(Error::Validation {
			message: "search.max_distance must be a finite number.".to_string(),
		});
	}
	if cfg.search.max_distance < 0.0 {
		return Err(Error::Validation {
			message: "search.max_distance must be zero or greater.".to_string(),
		});
	}
	if cfg.search.deadline_ms == Some(0) {
		return Err(Error::Validation {
			message: "search.deadline_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.mattermost.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "mattermost.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.mattermost.access_token.trim().is_empty() {
		return Err(Error::Validation {
			message: "mattermost.access_token must be non-empty.".to_string(),
		});
	}
	if !matches!(cfg.storage.qdrant.distance.as_str(), "cosine" | "euclid" | "dot") {
		return Err(Error::Validation {
			message: "storage.qdrant.distance must be one of cosine, euclid, or dot.".to_string(),
		});
	}

	for (label, value) in [
		("storage.qdrant.collection", &cfg.storage.qdrant.collection),
		("storage.qdrant.document_field", &cfg.storage.qdrant.document_field),
		("storage.qdrant.channel_field", &cfg.storage.qdrant.channel_field),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
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

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("llm", &cfg.providers.llm.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if let Some(template) = cfg.providers.llm.prompt_template.as_deref()
		&& !(template.contains("{context}") && template.contains("{query}"))
	{
		return Err(Error::Validation {
			message: "providers.llm.prompt_template must contain {context} and {query}."
				.to_string(),
		});
	}

	for (label, fields) in [
		("enrichment.user_fields", &cfg.enrichment.user_fields),
		("enrichment.channel_fields", &cfg.enrichment.channel_fields),
		("enrichment.team_fields", &cfg.enrichment.team_fields),
		("enrichment.post_fields", &cfg.enrichment.post_fields),
	] {
		if fields.iter().any(|field| field.trim().is_empty()) {
			return Err(Error::Validation {
				message: format!("{label} must not contain empty field names."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.providers
		.llm
		.prompt_template
		.as_deref()
		.map(|template| template.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.llm.prompt_template = None;
	}

	cfg.mattermost.api_base = cfg.mattermost.api_base.trim_end_matches('/').to_string();
}
