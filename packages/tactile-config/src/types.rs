use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub contextualizer: Contextualizer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm_rewriter: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Candidate retrieval, fusion, and entity resolution knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	/// Final number of fused candidates kept before the confidence filter.
	pub k: u32,
	/// Applied to a candidate's best per-channel score, never to the fused score.
	pub confidence_threshold: f32,
	pub rrf_k: f32,
	pub enable_embedding_search: bool,
	pub enable_fuzzy_matching: bool,
	/// Nearest-neighbour candidates requested from the vector index.
	pub semantic_k: u32,
	/// Rows requested per extracted name fragment.
	pub lexical_limit: u32,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self {
			k: 10,
			confidence_threshold: 0.35,
			rrf_k: 60.0,
			enable_embedding_search: true,
			enable_fuzzy_matching: true,
			semantic_k: 20,
			lexical_limit: 5,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Contextualizer {
	pub timeout_ms: u64,
	pub max_history_turns: u32,
}
impl Default for Contextualizer {
	fn default() -> Self {
		Self { timeout_ms: 5_000, max_history_turns: 6 }
	}
}
