use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Embeds one search query and checks the vector against the configured dimension.
pub async fn embed_query(
	cfg: &scout_config::EmbeddingProviderConfig,
	query: &str,
) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": [query],
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_query_vector(json, cfg.dimensions)
}

fn parse_query_vector(json: Value, dimensions: u32) -> Result<Vec<f32>> {
	let item = match json.get("data").and_then(Value::as_array).map(Vec::as_slice) {
		Some([item]) => item,
		Some(items) => {
			return Err(Error::InvalidResponse {
				message: format!("Embedding response must hold one vector, got {}.", items.len()),
			});
		},
		None => {
			return Err(Error::InvalidResponse {
				message: "Embedding response is missing data array.".to_string(),
			});
		},
	};
	let values = item.get("embedding").and_then(Value::as_array).ok_or_else(|| {
		Error::InvalidResponse { message: "Embedding item missing embedding array.".to_string() }
	})?;

	if values.len() != dimensions as usize {
		return Err(Error::InvalidResponse {
			message: format!("Embedding has {} dimensions, expected {dimensions}.", values.len()),
		});
	}

	values
		.iter()
		.map(|value| {
			value.as_f64().map(|number| number as f32).ok_or_else(|| Error::InvalidResponse {
				message: "Embedding value must be numeric.".to_string(),
			})
		})
		.collect()
}
