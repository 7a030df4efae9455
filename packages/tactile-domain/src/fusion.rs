//! Reciprocal Rank Fusion over per-channel ranked lists.
//!
//! `RRF(d) = sum over channels c containing d of 1 / (rrf_k + rank_c(d))`, where `rank_c` is the
//! 1-based position of `d` in channel `c`. Documents are merged by
//! [`CandidateDocument::fusion_key`]. The confidence threshold is applied to the best
//! per-channel score of a document, never to its fused score.

use std::{
	cmp::Ordering,
	collections::{BTreeMap, BTreeSet, HashMap},
};

use serde::Serialize;

use crate::candidate::{CandidateDocument, Channel, RankedList};

pub const DEFAULT_RRF_K: f32 = 60.0;
pub const DEFAULT_K: usize = 10;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionParams {
	pub rrf_k: f32,
	pub k: usize,
	pub confidence_threshold: f32,
}
impl Default for FusionParams {
	fn default() -> Self {
		Self {
			rrf_k: DEFAULT_RRF_K,
			k: DEFAULT_K,
			confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedResult {
	/// The first occurrence of the entity across channels.
	pub document: CandidateDocument,
	pub fused_score: f32,
	pub channels_present: BTreeSet<Channel>,
	pub channel_ranks: BTreeMap<Channel, u32>,
	pub best_channel_score: f32,
}
impl FusedResult {
	pub fn rank_in(&self, channel: Channel) -> Option<u32> {
		self.channel_ranks.get(&channel).copied()
	}
}

/// Full pipeline: rank, truncate to `k`, then drop low-confidence documents.
pub fn fuse(lists: &[RankedList], params: &FusionParams) -> Vec<FusedResult> {
	select(rank(lists, params.rrf_k), params.k, params.confidence_threshold)
}

/// Computes RRF scores for every distinct document and returns them as a total order.
///
/// Ties keep the order in which documents were first seen, walking `lists` in the given order.
pub fn rank(lists: &[RankedList], rrf_k: f32) -> Vec<FusedResult> {
	let mut merged: Vec<FusedResult> = Vec::new();
	let mut by_key: HashMap<String, usize> = HashMap::new();

	for list in lists {
		for (idx, document) in list.documents.iter().enumerate() {
			let rank = idx as u32 + 1;
			let contribution = rrf_contribution(rrf_k, rank);
			let key = document.fusion_key();

			match by_key.get(&key) {
				Some(&pos) => {
					let existing = &mut merged[pos];

					// A repeated entity inside one list only counts at its best rank.
					if existing.channel_ranks.contains_key(&list.channel) {
						continue;
					}

					existing.fused_score += contribution;
					existing.channels_present.insert(list.channel);
					existing.channel_ranks.insert(list.channel, rank);
					existing.best_channel_score =
						max_score(existing.best_channel_score, document.score);
				},
				None => {
					by_key.insert(key, merged.len());
					merged.push(FusedResult {
						document: document.clone(),
						fused_score: contribution,
						channels_present: BTreeSet::from([list.channel]),
						channel_ranks: BTreeMap::from([(list.channel, rank)]),
						best_channel_score: document.score,
					});
				},
			}
		}
	}

	// `sort_by` is stable, so equal scores stay in first-seen order.
	merged.sort_by(|left, right| cmp_f32_desc(left.fused_score, right.fused_score));

	merged
}

pub fn select(ranked: Vec<FusedResult>, k: usize, confidence_threshold: f32) -> Vec<FusedResult> {
	ranked
		.into_iter()
		.take(k)
		.filter(|result| result.best_channel_score >= confidence_threshold)
		.collect()
}

pub fn rrf_contribution(rrf_k: f32, rank: u32) -> f32 {
	1.0 / (rrf_k + rank as f32)
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn max_score(current: f32, candidate: f32) -> f32 {
	if candidate.is_nan() {
		return current;
	}
	if current.is_nan() {
		return candidate;
	}

	current.max(candidate)
}
