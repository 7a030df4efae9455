use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = tactile_ask::Args::parse();

	tactile_ask::run(args).await
}
