use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
You are a helpful assistant answering {user}'s question using only the chat messages below.
If the messages do not contain the answer, say that you could not find it.

Messages:
{context}

Question: {query}";

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub mattermost: Mattermost,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
	#[serde(default)]
	pub enrichment: Enrichment,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Mattermost {
	pub api_base: String,
	#[serde(default = "default_mattermost_api_path")]
	pub api_path: String,
	pub access_token: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	/// One of "cosine", "euclid" or "dot". Must match the collection's distance metric.
	#[serde(default = "default_distance")]
	pub distance: String,
	/// Payload key holding the message text.
	#[serde(default = "default_document_field")]
	pub document_field: String,
	/// Payload key the channel scope filter is applied to.
	#[serde(default = "default_channel_field")]
	pub channel_field: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	/// Prompt with `{context}`, `{query}` and `{user}` placeholders.
	pub prompt_template: Option<String>,
}
impl LlmProviderConfig {
	pub fn prompt_template(&self) -> &str {
		self.prompt_template.as_deref().unwrap_or(DEFAULT_PROMPT_TEMPLATE)
	}
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub result_limit: u32,
	pub max_distance: f32,
	pub deadline_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Enrichment {
	#[serde(default = "default_user_fields")]
	pub user_fields: Vec<String>,
	#[serde(default = "default_channel_fields")]
	pub channel_fields: Vec<String>,
	#[serde(default = "default_team_fields")]
	pub team_fields: Vec<String>,
	#[serde(default = "default_post_fields")]
	pub post_fields: Vec<String>,
}
impl Default for Enrichment {
	fn default() -> Self {
		Self {
			user_fields: default_user_fields(),
			channel_fields: default_channel_fields(),
			team_fields: default_team_fields(),
			post_fields: default_post_fields(),
		}
	}
}

fn default_mattermost_api_path() -> String {
	"/api/v4".to_string()
}

fn default_distance() -> String {
	"cosine".to_string()
}

fn default_document_field() -> String {
	"document".to_string()
}

fn default_channel_field() -> String {
	"channel_id".to_string()
}

fn default_user_fields() -> Vec<String> {
	vec!["username".to_string(), "first_name".to_string(), "last_name".to_string()]
}

fn default_channel_fields() -> Vec<String> {
	vec!["name".to_string(), "display_name".to_string(), "team_id".to_string()]
}

fn default_team_fields() -> Vec<String> {
	vec!["name".to_string(), "display_name".to_string()]
}

fn default_post_fields() -> Vec<String> {
	vec!["create_at".to_string(), "update_at".to_string()]
}
