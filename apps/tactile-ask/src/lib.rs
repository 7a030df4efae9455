use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use tactile_service::{ConversationTurn, ResolveRequest, SearchRequest, TactileService};
use tactile_storage::{db::Db, qdrant::QdrantStore};

#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Retrieve catalog context for a free-form question.
	Search {
		query: String,
		/// JSON array of `{ "role": "user" | "assistant", "content": "..." }` turns.
		#[arg(long, value_name = "FILE")]
		history: Option<PathBuf>,
	},
	/// Resolve switch names against the catalog.
	Resolve {
		#[arg(required = true)]
		names: Vec<String>,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = tactile_config::load(&args.config)?;

	init_tracing(&config);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let qdrant = QdrantStore::new(&config.storage.qdrant)?;

	tracing::info!(collection = %config.storage.qdrant.collection, "Catalog connections ready.");

	let service = TactileService::new(config, db, qdrant);
	let output = match args.command {
		Command::Search { query, history } => {
			let history = match history {
				Some(path) => load_history(&path)?,
				None => Vec::new(),
			};
			let response = service.search(SearchRequest { query, history }).await?;

			serde_json::to_string_pretty(&response)?
		},
		Command::Resolve { names } => {
			let response = service.resolve(ResolveRequest { names }).await;

			serde_json::to_string_pretty(&response)?
		},
	};

	println!("{output}");

	Ok(())
}

fn init_tracing(config: &tactile_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_history(path: &Path) -> color_eyre::Result<Vec<ConversationTurn>> {
	let raw = fs::read_to_string(path)
		.wrap_err_with(|| format!("Failed to read history file {}.", path.display()))?;
	let turns = serde_json::from_str(&raw)
		.wrap_err_with(|| format!("Failed to parse history file {}.", path.display()))?;

	Ok(turns)
}
