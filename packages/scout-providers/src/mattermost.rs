use std::time::Duration;

use reqwest::{Client, header::HeaderMap};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Thin client over the Mattermost REST API for membership and entity lookups.
pub struct MattermostClient {
	client: Client,
	base_url: String,
	headers: HeaderMap,
}
impl MattermostClient {
	pub fn new(cfg: &scout_config::Mattermost) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
		let headers = crate::auth_headers(&cfg.access_token, &cfg.default_headers)?;
		let base_url = format!("{}{}", cfg.api_base, cfg.api_path);

		Ok(Self { client, base_url, headers })
	}

	/// Team ids the user belongs to.
	pub async fn user_teams(&self, user_id: &str) -> Result<Vec<String>> {
		let json = self.get(&format!("/users/{}/teams", checked_id(user_id)?)).await?;

		entity_ids(&json, "teams")
	}

	/// Channel ids the user is a member of within one team.
	pub async fn user_team_channels(&self, user_id: &str, team_id: &str) -> Result<Vec<String>> {
		let json = self
			.get(&format!("/users/{}/teams/{}/channels", checked_id(user_id)?, checked_id(team_id)?))
			.await?;

		entity_ids(&json, "channels")
	}

	/// Fetches `/{entity}/{id}` and keeps only `fields`.
	pub async fn details(
		&self,
		entity: &str,
		entity_id: &str,
		fields: &[String],
	) -> Result<Map<String, Value>> {
		let json = self.get(&format!("/{entity}/{}", checked_id(entity_id)?)).await?;

		select_fields(json, fields)
	}

	async fn get(&self, path: &str) -> Result<Value> {
		let url = format!("{}{}", self.base_url, path);
		let res = self.client.get(url).headers(self.headers.clone()).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		Ok(json)
	}
}

pub fn entity_ids(json: &Value, label: &str) -> Result<Vec<String>> {
	let items = json.as_array().ok_or_else(|| Error::InvalidResponse {
		message: format!("Mattermost {label} response must be an array."),
	})?;
	let mut ids = Vec::with_capacity(items.len());

	for item in items {
		let id = item.get("id").and_then(Value::as_str).ok_or_else(|| Error::InvalidResponse {
			message: format!("Mattermost {label} entry is missing id."),
		})?;

		ids.push(id.to_string());
	}

	Ok(ids)
}

pub fn select_fields(json: Value, fields: &[String]) -> Result<Map<String, Value>> {
	let Value::Object(mut object) = json else {
		return Err(Error::InvalidResponse {
			message: "Mattermost entity response must be an object.".to_string(),
		});
	};
	let mut selected = Map::with_capacity(fields.len());

	for field in fields {
		let value = object.remove(field.as_str()).ok_or_else(|| Error::InvalidResponse {
			message: format!("Mattermost entity is missing field {field}."),
		})?;

		selected.insert(field.clone(), value);
	}

	Ok(selected)
}

// Ids are interpolated into URL paths.
fn checked_id(id: &str) -> Result<&str> {
	if id.is_empty()
		|| !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
	{
		return Err(Error::InvalidArgument { message: format!("Invalid Mattermost id {id:?}.") });
	}

	Ok(id)
}
