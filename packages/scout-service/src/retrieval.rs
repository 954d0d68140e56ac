use serde_json::{Map, Value};

use scout_storage::models::PointHit;

use crate::{ChannelScope, Deadline, Error, Result, Stage, VectorIndex};

/// Raw single-row answer of the vector index: four arrays that must line up index by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
	pub ids: Vec<String>,
	pub documents: Vec<String>,
	pub metadatas: Vec<Map<String, Value>>,
	pub distances: Vec<f32>,
}
impl QueryResult {
	pub fn from_hits(hits: Vec<PointHit>) -> Self {
		let mut result = Self {
			ids: Vec::with_capacity(hits.len()),
			documents: Vec::with_capacity(hits.len()),
			metadatas: Vec::with_capacity(hits.len()),
			distances: Vec::with_capacity(hits.len()),
		};

		for hit in hits {
			result.ids.push(hit.id);
			result.documents.push(hit.document);
			result.metadatas.push(hit.metadata);
			result.distances.push(hit.distance);
		}

		result
	}

	/// Collapses the parallel arrays into one record per match.
	pub fn into_matches(self) -> Result<Vec<SimilarityMatch>> {
		let len = self.ids.len();

		if self.documents.len() != len || self.metadatas.len() != len || self.distances.len() != len
		{
			return Err(Error::Retrieval {
				message: format!(
					"Index returned misaligned arrays (ids={}, documents={}, metadatas={}, distances={}).",
					len,
					self.documents.len(),
					self.metadatas.len(),
					self.distances.len()
				),
			});
		}

		let mut matches = Vec::with_capacity(len);

		for (((id, document), metadata), distance) in
			self.ids.into_iter().zip(self.documents).zip(self.metadatas).zip(self.distances)
		{
			if !distance.is_finite() || distance < 0.0 {
				return Err(Error::Retrieval {
					message: format!("Index returned invalid distance {distance} for {id}."),
				});
			}

			matches.push(SimilarityMatch { id, document, metadata, distance });
		}

		Ok(matches)
	}
}

/// One hit of the similarity query, in index response order.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
	pub id: String,
	pub document: String,
	pub metadata: Map<String, Value>,
	pub distance: f32,
}

/// Issues the single scoped query of a search. An empty scope matches nothing and the index is
/// not contacted.
pub async fn query_scoped(
	index: &dyn VectorIndex,
	query: &str,
	limit: u32,
	scope: &ChannelScope,
	deadline: Deadline,
) -> Result<Vec<SimilarityMatch>> {
	if scope.is_empty() {
		tracing::debug!("Channel scope is empty; skipping the index query.");

		return Ok(Vec::new());
	}

	let result = deadline
		.run(Stage::Retrieval, "query the vector index", index.query(query, limit, scope.as_slice()))
		.await?;
	let matches = result.into_matches()?;

	tracing::debug!(
		limit,
		matches = matches.len(),
		distances = ?matches.iter().map(|m| m.distance).collect::<Vec<_>>(),
		"Vector index queried."
	);

	Ok(matches)
}
