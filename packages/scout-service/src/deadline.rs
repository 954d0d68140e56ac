use std::{future::Future, time::Duration};

use tokio::time::{self, Instant};

use crate::{Result, Stage};

/// Per-request time budget shared by every remote call of one search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
	at: Option<Instant>,
}
impl Deadline {
	pub fn none() -> Self {
		Self { at: None }
	}

	pub fn after(budget: Duration) -> Self {
		Self { at: Some(Instant::now() + budget) }
	}

	pub fn from_millis(budget_ms: Option<u64>) -> Self {
		budget_ms.map(|ms| Self::after(Duration::from_millis(ms))).unwrap_or_default()
	}

	pub fn is_expired(&self) -> bool {
		self.at.map(|at| Instant::now() >= at).unwrap_or(false)
	}

	/// Runs one remote call, mapping both its failure and an expired budget to `stage`.
	pub(crate) async fn run<F, T>(&self, stage: Stage, what: &str, call: F) -> Result<T>
	where
		F: Future<Output = color_eyre::Result<T>>,
	{
		if self.is_expired() {
			return Err(stage.error(format!("Deadline exceeded before {what}.")));
		}

		let outcome = match self.at {
			None => call.await,
			Some(at) => {
				time::timeout_at(at, call)
					.await
					.map_err(|_| stage.error(format!("Deadline exceeded during {what}.")))?
			},
		};

		outcome.map_err(|err| stage.error(format!("Failed to {what}: {err:#}")))
	}
}
