// crates.io
use clap::Parser;
// self
use scout_search::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	scout_search::run(args).await
}
