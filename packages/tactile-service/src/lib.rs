pub mod contextualize;
pub mod fields;
pub mod package;
pub mod resolve;
pub mod retrieval;
pub mod search;
pub mod store;

mod error;

pub use contextualize::{ContextualizedQuery, ConversationTurn, TurnRole};
pub use error::{Error, Result};
pub use package::{ContextItem, ContextMetadata, PackagedContext};
pub use resolve::{
	EntityResolver, MatchTier, Matcher, ResolutionBatchResult, ResolveRequest, ResolveResponse,
	ResolvedEntity,
};
pub use retrieval::{CandidateRetriever, ChannelResults, RetrievalSettings};
pub use search::{SearchRequest, SearchResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;
use uuid::Uuid;

use tactile_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use tactile_providers::{embedding, generation};
use tactile_storage::{
	db::Db,
	models::{SwitchRecord, VectorHit},
	qdrant::QdrantStore,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>>;
}

/// Read-only access to the switch catalog.
pub trait EntityStore
where
	Self: Send + Sync,
{
	fn get_by_exact_name<'a>(
		&'a self,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<SwitchRecord>>>;

	fn get_by_case_insensitive_name<'a>(
		&'a self,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<SwitchRecord>>>;

	/// Names containing the fragment, or contained in it.
	fn get_by_substring<'a>(
		&'a self,
		fragment: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SwitchRecord>>>;

	fn keyword_search<'a>(
		&'a self,
		fragment: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<SwitchRecord>>>;

	fn get_by_ids<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<SwitchRecord>>>;
}

pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, vector: Vec<f32>, k: u32) -> BoxFuture<'a, Result<Vec<VectorHit>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generation: Arc<dyn GenerationProvider>,
	) -> Self {
		Self { embedding, generation }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), generation: provider }
	}
}

pub struct TactileService {
	pub cfg: Config,
	pub providers: Providers,
	pub store: Arc<dyn EntityStore>,
	pub vectors: Arc<dyn VectorIndex>,
}
impl TactileService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self::with_parts(cfg, Providers::default(), Arc::new(db), Arc::new(qdrant))
	}

	pub fn with_parts(
		cfg: Config,
		providers: Providers,
		store: Arc<dyn EntityStore>,
		vectors: Arc<dyn VectorIndex>,
	) -> Self {
		Self { cfg, providers, store, vectors }
	}

	pub fn retriever(&self) -> CandidateRetriever {
		CandidateRetriever::new(
			RetrievalSettings::from_config(&self.cfg.retrieval),
			self.cfg.providers.embedding.clone(),
			self.providers.embedding.clone(),
			self.store.clone(),
			self.vectors.clone(),
		)
	}

	pub fn resolver(&self) -> EntityResolver {
		EntityResolver::new(self.store.clone(), self.cfg.retrieval.enable_fuzzy_matching)
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}
impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(generation::generate(cfg, messages).await?) })
	}
}
