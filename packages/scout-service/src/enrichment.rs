use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use scout_config::Enrichment;

use crate::{Deadline, IdentityProvider, Result, SimilarityMatch, Stage};

pub const USER_ID_KEY: &str = "user_id";
pub const CHANNEL_ID_KEY: &str = "channel_id";
pub const TEAM_ID_KEY: &str = "team_id";
pub const POST_ID_KEY: &str = "post_id";

/// Requested fields of one entity, plus the derived `name` for users, channels and teams.
pub type Details = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	User,
	Channel,
	Team,
	Post,
}
impl EntityKind {
	pub fn as_path(self) -> &'static str {
		match self {
			Self::User => "users",
			Self::Channel => "channels",
			Self::Team => "teams",
			Self::Post => "posts",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedContextRecord {
	pub id: String,
	pub distance: f32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<Details>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub channel: Option<Details>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub team: Option<Details>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub post: Option<Details>,
	pub document: String,
}

/// `first_name last_name`, or the username when both are blank.
pub fn user_display_name(details: &Details) -> Option<String> {
	let first = text_field(details, "first_name").unwrap_or_default();
	let last = text_field(details, "last_name").unwrap_or_default();
	let real_name = format!("{first} {last}").trim().to_string();

	if !real_name.is_empty() {
		return Some(real_name);
	}

	details.get("username").and_then(Value::as_str).map(str::to_string)
}

/// `display_name`, or the internal `name` when the display name is blank. Used for channels
/// and teams.
pub fn channel_display_name(details: &Details) -> Option<String> {
	if let Some(display_name) = text_field(details, "display_name") {
		return Some(display_name.to_string());
	}

	details.get("name").and_then(Value::as_str).map(str::to_string)
}

/// Resolves the author, channel, team and post behind every surviving match.
///
/// A failed lookup fails the whole aggregation.
pub async fn enrich_matches(
	identity: &dyn IdentityProvider,
	fields: &Enrichment,
	matches: &[&SimilarityMatch],
	deadline: Deadline,
) -> Result<Vec<EnrichedContextRecord>> {
	let mut lookups = Lookups { identity, fields, deadline, resolved: HashMap::new() };
	let mut records = Vec::with_capacity(matches.len());

	for item in matches {
		let metadata = &item.metadata;
		let user = match text_field(metadata, USER_ID_KEY) {
			Some(user_id) => Some(lookups.get(EntityKind::User, user_id).await?),
			None => None,
		};
		let channel = match text_field(metadata, CHANNEL_ID_KEY) {
			Some(channel_id) => Some(lookups.get(EntityKind::Channel, channel_id).await?),
			None => None,
		};
		// Direct and group channels carry an empty team_id.
		let team_id = text_field(metadata, TEAM_ID_KEY)
			.or_else(|| channel.as_ref().and_then(|details| text_field(details, TEAM_ID_KEY)))
			.map(str::to_string);
		let team = match team_id {
			Some(team_id) => Some(lookups.get(EntityKind::Team, &team_id).await?),
			None => None,
		};
		let post = match text_field(metadata, POST_ID_KEY) {
			Some(post_id) => Some(lookups.get(EntityKind::Post, post_id).await?),
			None => None,
		};

		records.push(EnrichedContextRecord {
			id: item.id.clone(),
			distance: item.distance,
			user,
			channel,
			team,
			post,
			document: item.document.clone(),
		});
	}

	tracing::debug!(
		records = records.len(),
		lookups = lookups.resolved.len(),
		"Context records enriched."
	);

	Ok(records)
}

struct Lookups<'a> {
	identity: &'a dyn IdentityProvider,
	fields: &'a Enrichment,
	deadline: Deadline,
	resolved: HashMap<(EntityKind, String), Details>,
}
impl Lookups<'_> {
	async fn get(&mut self, kind: EntityKind, entity_id: &str) -> Result<Details> {
		let key = (kind, entity_id.to_string());

		if let Some(details) = self.resolved.get(&key) {
			return Ok(details.clone());
		}

		let fields = match kind {
			EntityKind::User => &self.fields.user_fields,
			EntityKind::Channel => &self.fields.channel_fields,
			EntityKind::Team => &self.fields.team_fields,
			EntityKind::Post => &self.fields.post_fields,
		};
		let what = format!("fetch {} {entity_id}", kind.as_path());
		let mut details = self
			.deadline
			.run(Stage::Enrichment, &what, self.identity.details(kind, entity_id, fields))
			.await?;
		if let Some(name) = derived_name(kind, &details) {
			details.insert("name".to_string(), Value::String(name));
		}

		self.resolved.insert(key, details.clone());

		Ok(details)
	}
}

fn derived_name(kind: EntityKind, details: &Details) -> Option<String> {
	match kind {
		EntityKind::User => user_display_name(details),
		EntityKind::Channel => channel_display_name(details),
		// Only when both name fields were requested.
		EntityKind::Team if details.contains_key("name") && details.contains_key("display_name") =>
			channel_display_name(details),
		EntityKind::Team | EntityKind::Post => None,
	}
}

// Non-empty string value; null and other types count as absent.
fn text_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
	map.get(key).and_then(Value::as_str).filter(|value| !value.trim().is_empty())
}
