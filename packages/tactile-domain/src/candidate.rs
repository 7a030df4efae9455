use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
	Semantic,
	Lexical,
}
impl Channel {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Semantic => "semantic",
			Self::Lexical => "lexical",
		}
	}
}

/// One retrieved catalog item as produced by a single channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateDocument {
	pub id: String,
	pub content: String,
	pub channel: Channel,
	pub score: f32,
	pub source_entity_name: Option<String>,
	pub metadata: Map<String, Value>,
}
impl CandidateDocument {
	/// Identity used to merge the same entity across channels.
	pub fn fusion_key(&self) -> String {
		match self.source_entity_name.as_deref() {
			Some(name) if !name.trim().is_empty() => name.trim().to_lowercase(),
			_ => self.id.to_lowercase(),
		}
	}
}

/// Ordered output of one channel; the 1-based rank is the position in `documents`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedList {
	pub channel: Channel,
	pub documents: Vec<CandidateDocument>,
}
impl RankedList {
	pub fn new(channel: Channel, documents: Vec<CandidateDocument>) -> Self {
		Self { channel, documents }
	}

	pub fn empty(channel: Channel) -> Self {
		Self { channel, documents: Vec::new() }
	}

	pub fn len(&self) -> usize {
		self.documents.len()
	}

	pub fn is_empty(&self) -> bool {
		self.documents.is_empty()
	}
}
