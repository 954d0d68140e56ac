pub mod answer;
pub mod deadline;
pub mod enrichment;
pub mod relevance;
pub mod retrieval;
pub mod scope;
pub mod search;

mod error;

pub use answer::{NO_MATCH_ANSWER, SearchResult};
pub use deadline::Deadline;
pub use enrichment::{Details, EnrichedContextRecord, EntityKind};
pub use error::{Error, Result, Stage};
pub use retrieval::{QueryResult, SimilarityMatch};
pub use scope::ChannelScope;
pub use search::SearchRequest;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::{Map, Value};

use scout_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use scout_providers::{chat, embedding, mattermost::MattermostClient};
use scout_storage::qdrant::QdrantStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of truth for team/channel membership and entity details.
pub trait IdentityProvider
where
	Self: Send + Sync,
{
	fn user_teams<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<String>>>;

	fn user_team_channels<'a>(
		&'a self,
		user_id: &'a str,
		team_id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<String>>>;

	fn details<'a>(
		&'a self,
		entity: EntityKind,
		entity_id: &'a str,
		fields: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Map<String, Value>>>;
}

/// Similarity index over indexed messages. Implementations must apply the channel restriction
/// on the server side.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn query<'a>(
		&'a self,
		text: &'a str,
		limit: u32,
		channel_ids: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<QueryResult>>;
}

pub trait AnswerGenerator
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		context: &'a str,
		query: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub identity: Arc<dyn IdentityProvider>,
	pub index: Arc<dyn VectorIndex>,
	pub generator: Arc<dyn AnswerGenerator>,
}
impl Providers {
	pub fn new(
		identity: Arc<dyn IdentityProvider>,
		index: Arc<dyn VectorIndex>,
		generator: Arc<dyn AnswerGenerator>,
	) -> Self {
		Self { identity, index, generator }
	}

	/// Mattermost for identity, embeddings plus Qdrant for the index, chat completions for
	/// answers.
	pub fn from_config(cfg: &Config) -> color_eyre::Result<Self> {
		let identity = MattermostIdentity { client: MattermostClient::new(&cfg.mattermost)? };
		let index = QdrantIndex {
			embedding: cfg.providers.embedding.clone(),
			store: QdrantStore::new(&cfg.storage.qdrant)?,
		};
		let generator = ChatGenerator { llm: cfg.providers.llm.clone() };

		Ok(Self::new(Arc::new(identity), Arc::new(index), Arc::new(generator)))
	}
}

pub struct ScoutService {
	pub cfg: Config,
	pub providers: Providers,
}
impl ScoutService {
	pub fn new(cfg: Config) -> color_eyre::Result<Self> {
		let providers = Providers::from_config(&cfg)?;

		Ok(Self { cfg, providers })
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}
}

struct MattermostIdentity {
	client: MattermostClient,
}
impl IdentityProvider for MattermostIdentity {
	fn user_teams<'a>(
		&'a self,
		user_id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<String>>> {
		Box::pin(async move { Ok(self.client.user_teams(user_id).await?) })
	}

	fn user_team_channels<'a>(
		&'a self,
		user_id: &'a str,
		team_id: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<Vec<String>>> {
		Box::pin(async move { Ok(self.client.user_team_channels(user_id, team_id).await?) })
	}

	fn details<'a>(
		&'a self,
		entity: EntityKind,
		entity_id: &'a str,
		fields: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Map<String, Value>>> {
		Box::pin(async move { Ok(self.client.details(entity.as_path(), entity_id, fields).await?) })
	}
}

struct QdrantIndex {
	embedding: EmbeddingProviderConfig,
	store: QdrantStore,
}
impl VectorIndex for QdrantIndex {
	fn query<'a>(
		&'a self,
		text: &'a str,
		limit: u32,
		channel_ids: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<QueryResult>> {
		Box::pin(async move {
			let vector = embedding::embed_query(&self.embedding, text).await?;
			let hits = self.store.query_scoped(vector, limit, channel_ids).await?;

			Ok(QueryResult::from_hits(hits))
		})
	}
}

struct ChatGenerator {
	llm: LlmProviderConfig,
}
impl AnswerGenerator for ChatGenerator {
	fn generate<'a>(
		&'a self,
		context: &'a str,
		query: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Ok(chat::generate(&self.llm, context, query, user).await?) })
	}
}
