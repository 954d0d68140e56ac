use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use scout_service::{ScoutService, SearchRequest};

#[derive(Debug, Parser)]
#[command(
	version = scout_cli::VERSION,
	rename_all = "kebab",
	styles = scout_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Mattermost id of the user the search runs for.
	#[arg(long, short = 'u', value_name = "ID")]
	pub user_id: String,
	/// Name the answer is addressed to.
	#[arg(long, value_name = "NAME")]
	pub user_name: String,
	/// Return the matching conversations without asking the language model.
	#[arg(long)]
	pub context_only: bool,
	#[arg(value_name = "QUERY")]
	pub query: String,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = scout_config::load(&args.config)?;
	init_tracing(&config);
	let service = ScoutService::new(config)?;
	let req = SearchRequest {
		user_id: args.user_id,
		user_name: args.user_name,
		query: args.query,
		generate_answer: !args.context_only,
	};

	match service.search(req).await {
		Ok(result) => {
			println!("{}", serde_json::to_string_pretty(&result)?);
			Ok(())
		},
		Err(err) => {
			tracing::error!(
				stage = err.stage().map(|stage| stage.as_str()).unwrap_or("request"),
				error = %err,
				"Search failed."
			);
			let message = err.user_message();

			Err(eyre::Report::new(err).wrap_err(message))
		},
	}
}

/// `RUST_LOG` wins over `service.log_level`; an unparsable value falls through to the next source.
pub fn log_filter(env_directives: Option<&str>, log_level: &str) -> EnvFilter {
	env_directives
		.and_then(|directives| EnvFilter::try_new(directives).ok())
		.or_else(|| EnvFilter::try_new(log_level).ok())
		.unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing(config: &scout_config::Config) {
	let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
	let filter = log_filter(env_directives.as_deref(), &config.service.log_level);
	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();
}
