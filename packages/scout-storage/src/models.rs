use std::collections::HashMap;

use qdrant_client::qdrant::{ScoredPoint, Value, point_id::PointIdOptions, value::Kind};
use serde_json::{Map, Number};

use crate::{Error, Result};

/// Collection distance metric, used to turn a Qdrant score into a distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
	Cosine,
	Euclid,
	Dot,
}
impl DistanceMetric {
	pub fn parse(raw: &str) -> Result<Self> {
		match raw {
			"cosine" => Ok(Self::Cosine),
			"euclid" => Ok(Self::Euclid),
			"dot" => Ok(Self::Dot),
			other => Err(Error::InvalidArgument(format!("Unknown distance metric {other:?}."))),
		}
	}

	/// Non-negative distance where smaller means more similar.
	pub fn to_distance(self, score: f32) -> f32 {
		match self {
			Self::Cosine | Self::Dot => (1.0 - score).max(0.0),
			Self::Euclid => score.max(0.0),
		}
	}
}

/// One decoded search hit: point id, message text, remaining payload, distance.
#[derive(Debug, Clone, PartialEq)]
pub struct PointHit {
	pub id: String,
	pub document: String,
	pub metadata: Map<String, serde_json::Value>,
	pub distance: f32,
}

pub fn decode_point(
	point: ScoredPoint,
	document_field: &str,
	metric: DistanceMetric,
) -> Result<PointHit> {
	let id = point
		.id
		.as_ref()
		.and_then(|id| id.point_id_options.as_ref())
		.map(|options| match options {
			PointIdOptions::Num(num) => num.to_string(),
			PointIdOptions::Uuid(uuid) => uuid.clone(),
		})
		.ok_or_else(|| Error::InvalidPayload("Scored point is missing an id.".to_string()))?;
	let mut payload: HashMap<String, Value> = point.payload;
	let document = match payload.remove(document_field).and_then(|value| value.kind) {
		Some(Kind::StringValue(text)) => text,
		_ => {
			return Err(Error::InvalidPayload(format!(
				"Point {id} is missing string field {document_field}."
			)));
		},
	};
	let metadata = payload.into_iter().map(|(key, value)| (key, value_to_json(value))).collect();

	Ok(PointHit { id, document, metadata, distance: metric.to_distance(point.score) })
}

pub fn value_to_json(value: Value) -> serde_json::Value {
	match value.kind {
		None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
		Some(Kind::BoolValue(flag)) => serde_json::Value::Bool(flag),
		Some(Kind::IntegerValue(number)) => serde_json::Value::from(number),
		Some(Kind::DoubleValue(number)) =>
			Number::from_f64(number).map(serde_json::Value::Number).unwrap_or_default(),
		Some(Kind::StringValue(text)) => serde_json::Value::String(text),
		Some(Kind::ListValue(list)) =>
			serde_json::Value::Array(list.values.into_iter().map(value_to_json).collect()),
		Some(Kind::StructValue(object)) => serde_json::Value::Object(
			object.fields.into_iter().map(|(key, value)| (key, value_to_json(value))).collect(),
		),
	}
}
