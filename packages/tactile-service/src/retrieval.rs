//! Hybrid candidate retrieval: a semantic channel over the vector index and a lexical channel over
//! catalog names, run concurrently and isolated from each other's failures.

use std::{
	collections::{HashMap, HashSet},
	sync::Arc,
};

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{EmbeddingProvider, EntityStore, Error, Result, VectorIndex, fields, package};
use tactile_config::{EmbeddingProviderConfig, Retrieval};
use tactile_domain::{
	candidate::{CandidateDocument, Channel, RankedList},
	fragments, fuzzy,
	fusion::{self, FusedResult, FusionParams},
};
use tactile_storage::models::SwitchRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalSettings {
	pub semantic_k: u32,
	pub lexical_limit: u32,
	pub enable_embedding_search: bool,
	pub fusion: FusionParams,
}
impl RetrievalSettings {
	pub fn from_config(cfg: &Retrieval) -> Self {
		Self {
			semantic_k: cfg.semantic_k,
			lexical_limit: cfg.lexical_limit,
			enable_embedding_search: cfg.enable_embedding_search,
			fusion: FusionParams {
				rrf_k: cfg.rrf_k,
				k: cfg.k as usize,
				confidence_threshold: cfg.confidence_threshold,
			},
		}
	}
}
impl Default for RetrievalSettings {
	fn default() -> Self {
		Self::from_config(&Retrieval::default())
	}
}

#[derive(Debug, Clone)]
pub struct ChannelResults {
	pub semantic: RankedList,
	pub lexical: RankedList,
	/// Failed channels, treated as empty, and hits a channel had to drop.
	pub warnings: Vec<String>,
}
impl ChannelResults {
	pub fn lists(&self) -> [RankedList; 2] {
		[self.semantic.clone(), self.lexical.clone()]
	}
}

/// Documents from one channel plus degradations that did not fail it outright.
#[derive(Debug, Default)]
struct ChannelHits {
	documents: Vec<CandidateDocument>,
	notes: Vec<String>,
}

#[derive(Clone)]
pub struct CandidateRetriever {
	settings: RetrievalSettings,
	embedding_cfg: EmbeddingProviderConfig,
	embedding: Arc<dyn EmbeddingProvider>,
	store: Arc<dyn EntityStore>,
	vectors: Arc<dyn VectorIndex>,
}
impl CandidateRetriever {
	pub fn new(
		settings: RetrievalSettings,
		embedding_cfg: EmbeddingProviderConfig,
		embedding: Arc<dyn EmbeddingProvider>,
		store: Arc<dyn EntityStore>,
		vectors: Arc<dyn VectorIndex>,
	) -> Self {
		Self { settings, embedding_cfg, embedding, store, vectors }
	}

	pub fn settings(&self) -> &RetrievalSettings {
		&self.settings
	}

	/// A copy sharing the same collaborators with different settings. `self` is left untouched.
	pub fn with_settings(&self, settings: RetrievalSettings) -> Self {
		Self { settings, ..self.clone() }
	}

	pub async fn retrieve(&self, query: &str) -> ChannelResults {
		let (semantic, lexical) =
			tokio::join!(self.semantic_channel(query), self.lexical_channel(query));
		let mut warnings = Vec::new();
		let semantic = settle(Channel::Semantic, semantic, &mut warnings);
		let lexical = settle(Channel::Lexical, lexical, &mut warnings);

		ChannelResults { semantic, lexical, warnings }
	}

	pub fn fuse(&self, results: &ChannelResults) -> Vec<FusedResult> {
		fusion::fuse(&results.lists(), &self.settings.fusion)
	}

	async fn semantic_channel(&self, query: &str) -> Result<ChannelHits> {
		if !self.settings.enable_embedding_search {
			return Ok(ChannelHits::default());
		}

		let texts = vec![query.to_string()];
		let vector = self
			.embedding
			.embed(&self.embedding_cfg, &texts)
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			})?;

		if vector.len() != self.embedding_cfg.dimensions as usize {
			return Err(Error::Provider {
				message: format!(
					"Embedding has {} dimensions; expected {}.",
					vector.len(),
					self.embedding_cfg.dimensions
				),
			});
		}

		let hits = self.vectors.search(vector, self.settings.semantic_k).await?;

		if hits.is_empty() {
			return Ok(ChannelHits::default());
		}

		let ids: Vec<Uuid> = hits.iter().map(|hit| hit.switch_id).collect();
		let records: HashMap<Uuid, SwitchRecord> = self
			.store
			.get_by_ids(&ids)
			.await?
			.into_iter()
			.map(|record| (record.switch_id, record))
			.collect();
		let mut documents = Vec::with_capacity(hits.len());
		let mut skipped = 0;

		for hit in hits {
			let Some(record) = records.get(&hit.switch_id) else {
				tracing::warn!(switch_id = %hit.switch_id, "Vector hit has no catalog row. Skipping.");

				skipped += 1;

				continue;
			};

			documents.push(candidate_document(record, Channel::Semantic, hit.score, None));
		}

		let mut notes = Vec::new();

		if skipped > 0 {
			notes.push(format!(
				"The semantic channel skipped {skipped} vector hit(s) with no catalog row."
			));
		}

		Ok(ChannelHits { documents, notes })
	}

	async fn lexical_channel(&self, query: &str) -> Result<ChannelHits> {
		let mut documents = Vec::new();
		let mut seen = HashSet::new();

		for fragment in fragments::extract_name_fragments(query) {
			let records = self.store.keyword_search(&fragment, self.settings.lexical_limit).await?;

			for record in records {
				if !seen.insert(record.name.trim().to_lowercase()) {
					continue;
				}

				let score = fuzzy::fuzzy_confidence(&fragment, &record.name);

				documents.push(candidate_document(&record, Channel::Lexical, score, Some(&fragment)));
			}
		}

		Ok(ChannelHits { documents, notes: Vec::new() })
	}
}

fn settle(
	channel: Channel,
	outcome: Result<ChannelHits>,
	warnings: &mut Vec<String>,
) -> RankedList {
	match outcome {
		Ok(ChannelHits { documents, notes }) => {
			warnings.extend(notes);

			RankedList::new(channel, documents)
		},
		Err(err) => {
			tracing::warn!(channel = channel.as_str(), error = %err, "Retrieval channel failed.");
			warnings.push(format!("The {} channel failed: {err}", channel.as_str()));

			RankedList::empty(channel)
		},
	}
}

pub fn candidate_document(
	record: &SwitchRecord,
	channel: Channel,
	score: f32,
	matched_fragment: Option<&str>,
) -> CandidateDocument {
	let missing: Vec<Value> =
		fields::missing_fields(record).into_iter().map(Value::String).collect();
	let mut metadata = Map::new();

	metadata.insert("switch_id".to_string(), Value::String(record.switch_id.to_string()));

	if let Some(manufacturer) = record.manufacturer.as_deref() {
		metadata.insert("manufacturer".to_string(), Value::String(manufacturer.to_string()));
	}
	if let Some(fragment) = matched_fragment {
		metadata.insert("matched_fragment".to_string(), Value::String(fragment.to_string()));
	}

	metadata.insert("missing_fields".to_string(), Value::Array(missing));

	CandidateDocument {
		id: record.switch_id.to_string(),
		content: package::render_record_block(record, None),
		channel,
		score,
		source_entity_name: Some(record.name.clone()),
		metadata,
	}
}
