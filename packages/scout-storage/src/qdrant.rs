use qdrant_client::qdrant::{Condition, Filter, Query, QueryPointsBuilder};

use crate::{
	Error, Result,
	models::{self, DistanceMetric, PointHit},
};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
	pub metric: DistanceMetric,
	pub document_field: String,
	pub channel_field: String,
}
impl QdrantStore {
	pub fn new(cfg: &scout_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_dim: cfg.vector_dim,
			metric: DistanceMetric::parse(&cfg.distance)?,
			document_field: cfg.document_field.clone(),
			channel_field: cfg.channel_field.clone(),
		})
	}

	/// Nearest neighbours of `vector`, restricted server-side to points whose channel is in
	/// `channel_ids`. Hits keep the order Qdrant returns them in.
	pub async fn query_scoped(
		&self,
		vector: Vec<f32>,
		limit: u32,
		channel_ids: &[String],
	) -> Result<Vec<PointHit>> {
		if channel_ids.is_empty() {
			return Err(Error::InvalidArgument("Channel scope must be non-empty.".to_string()));
		}
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument("Query vector dimension mismatch.".to_string()));
		}

		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.filter(channel_scope_filter(&self.channel_field, channel_ids))
			.with_payload(true)
			.limit(limit as u64);
		let response = self.client.query(search).await?;

		response
			.result
			.into_iter()
			.map(|point| models::decode_point(point, &self.document_field, self.metric))
			.collect()
	}
}

pub fn channel_scope_filter(channel_field: &str, channel_ids: &[String]) -> Filter {
	Filter::must([Condition::matches(channel_field.to_string(), channel_ids.to_vec())])
}
