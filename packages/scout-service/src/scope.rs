use std::collections::HashSet;

use crate::{Deadline, IdentityProvider, Result, Stage};

/// Channels one user may read, resolved fresh for every search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelScope {
	ids: Vec<String>,
}
impl ChannelScope {
	/// Keeps the first occurrence of every id.
	pub fn from_ids<I>(ids: I) -> Self
	where
		I: IntoIterator<Item = String>,
	{
		let mut seen = HashSet::new();
		let ids = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();

		Self { ids }
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn as_slice(&self) -> &[String] {
		&self.ids
	}
}

/// Walks the user's teams and collects the channels the user belongs to in each of them.
///
/// Any failed lookup fails the whole resolution; a partial scope is never returned.
pub async fn resolve_channel_scope(
	identity: &dyn IdentityProvider,
	user_id: &str,
	deadline: Deadline,
) -> Result<ChannelScope> {
	let teams = deadline
		.run(Stage::ScopeResolution, "fetch teams of user", identity.user_teams(user_id))
		.await?;
	let mut channels = Vec::new();

	for team_id in &teams {
		let team_channels = deadline
			.run(
				Stage::ScopeResolution,
				"fetch channels of user in team",
				identity.user_team_channels(user_id, team_id),
			)
			.await?;

		channels.extend(team_channels);
	}

	let scope = ChannelScope::from_ids(channels);

	tracing::debug!(user_id, teams = teams.len(), channels = scope.len(), "Channel scope resolved.");

	Ok(scope)
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use serde_json::{Map, Value};

	use super::*;
	use crate::{BoxFuture, EntityKind, Error};

	struct StaticIdentity {
		teams: Vec<String>,
		channels: HashMap<String, Vec<String>>,
		failing_team: Option<String>,
	}
	impl IdentityProvider for StaticIdentity {
		fn user_teams<'a>(
			&'a self,
			_user_id: &'a str,
		) -> BoxFuture<'a, color_eyre::Result<Vec<String>>> {
			let teams = self.teams.clone();

			Box::pin(async move { Ok(teams) })
		}

		fn user_team_channels<'a>(
			&'a self,
			_user_id: &'a str,
			team_id: &'a str,
		) -> BoxFuture<'a, color_eyre::Result<Vec<String>>> {
			let failing = self.failing_team.as_deref() == Some(team_id);
			let channels = self.channels.get(team_id).cloned().unwrap_or_default();

			Box::pin(async move {
				if failing {
					return Err(color_eyre::eyre::eyre!("team lookup failed"));
				}

				Ok(channels)
			})
		}

		fn details<'a>(
			&'a self,
			_entity: EntityKind,
			_entity_id: &'a str,
			_fields: &'a [String],
		) -> BoxFuture<'a, color_eyre::Result<Map<String, Value>>> {
			Box::pin(async move { Ok(Map::new()) })
		}
	}

	fn ids(raw: &[&str]) -> Vec<String> {
		raw.iter().map(|id| id.to_string()).collect()
	}

	#[test]
	fn from_ids_drops_duplicates() {
		let scope = ChannelScope::from_ids(ids(&["c1", "c2", "c1", "c3", "c2"]));

		assert_eq!(scope.as_slice(), ids(&["c1", "c2", "c3"]).as_slice());
	}

	#[tokio::test]
	async fn channels_shared_across_teams_appear_once() {
		let identity = StaticIdentity {
			teams: ids(&["t1", "t2"]),
			channels: HashMap::from([
				("t1".to_string(), ids(&["c1", "dm-1"])),
				("t2".to_string(), ids(&["c2", "dm-1"])),
			]),
			failing_team: None,
		};
		let scope =
			resolve_channel_scope(&identity, "u1", Deadline::none()).await.expect("resolve failed");

		assert_eq!(scope.as_slice(), ids(&["c1", "dm-1", "c2"]).as_slice());
	}

	#[tokio::test]
	async fn user_without_teams_has_empty_scope() {
		let identity =
			StaticIdentity { teams: Vec::new(), channels: HashMap::new(), failing_team: None };
		let scope =
			resolve_channel_scope(&identity, "u1", Deadline::none()).await.expect("resolve failed");

		assert!(scope.is_empty());
	}

	#[tokio::test]
	async fn failing_team_fails_the_whole_scope() {
		let identity = StaticIdentity {
			teams: ids(&["t1", "t2"]),
			channels: HashMap::from([("t1".to_string(), ids(&["c1"]))]),
			failing_team: Some("t2".to_string()),
		};
		let err = resolve_channel_scope(&identity, "u1", Deadline::none())
			.await
			.expect_err("expected resolution failure");

		assert!(matches!(err, Error::ScopeResolution { .. }));
	}
}
