//! Cascading name resolution against the catalog.
//!
//! Each name walks the tiers in order (exact, case-insensitive, fuzzy) and stops at the first hit.
//! A lookup failure for one name never affects the others in the batch.

use std::{collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
	BoxFuture, EntityStore, Result, TactileService, fields,
	package::{self, PackagedContext},
};
use tactile_domain::fuzzy;
use tactile_storage::models::SwitchRecord;

pub const FUZZY_CANDIDATE_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
	Exact,
	CaseInsensitive,
	Fuzzy,
	None,
}
impl MatchTier {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Exact => "exact",
			Self::CaseInsensitive => "case_insensitive",
			Self::Fuzzy => "fuzzy",
			Self::None => "none",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierMatch {
	pub record: SwitchRecord,
	pub confidence: f32,
}

/// One resolution strategy. `Ok(None)` passes the name to the next tier.
pub trait Matcher
where
	Self: Send + Sync,
{
	fn tier(&self) -> MatchTier;

	fn attempt<'a>(
		&'a self,
		store: &'a dyn EntityStore,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<TierMatch>>>;
}

pub struct ExactMatcher;
impl Matcher for ExactMatcher {
	fn tier(&self) -> MatchTier {
		MatchTier::Exact
	}

	fn attempt<'a>(
		&'a self,
		store: &'a dyn EntityStore,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<TierMatch>>> {
		Box::pin(async move {
			let record = store.get_by_exact_name(name).await?;

			Ok(record.map(|record| TierMatch { record, confidence: 1.0 }))
		})
	}
}

pub struct CaseInsensitiveMatcher;
impl Matcher for CaseInsensitiveMatcher {
	fn tier(&self) -> MatchTier {
		MatchTier::CaseInsensitive
	}

	fn attempt<'a>(
		&'a self,
		store: &'a dyn EntityStore,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<TierMatch>>> {
		Box::pin(async move {
			let record = store.get_by_case_insensitive_name(name).await?;

			Ok(record.map(|record| TierMatch { record, confidence: 1.0 }))
		})
	}
}

/// Substring candidates, of which the shortest name wins.
pub struct FuzzyMatcher {
	pub candidate_limit: u32,
}
impl Default for FuzzyMatcher {
	fn default() -> Self {
		Self { candidate_limit: FUZZY_CANDIDATE_LIMIT }
	}
}
impl Matcher for FuzzyMatcher {
	fn tier(&self) -> MatchTier {
		MatchTier::Fuzzy
	}

	fn attempt<'a>(
		&'a self,
		store: &'a dyn EntityStore,
		name: &'a str,
	) -> BoxFuture<'a, Result<Option<TierMatch>>> {
		Box::pin(async move {
			let candidates = store.get_by_substring(name, self.candidate_limit).await?;
			let best = candidates.into_iter().min_by_key(|record| record.name.chars().count());

			Ok(best.map(|record| {
				let confidence = fuzzy::fuzzy_confidence(name, &record.name);

				TierMatch { record, confidence }
			}))
		})
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEntity {
	pub original_query: String,
	pub resolved_name: String,
	pub record: Option<SwitchRecord>,
	pub match_confidence: Option<f32>,
	pub match_tier: MatchTier,
	pub found: bool,
	pub missing_fields: BTreeSet<String>,
}
impl ResolvedEntity {
	fn found(original_query: &str, tier: MatchTier, hit: TierMatch) -> Self {
		Self {
			original_query: original_query.to_string(),
			resolved_name: hit.record.name.clone(),
			missing_fields: fields::missing_fields(&hit.record),
			record: Some(hit.record),
			match_confidence: Some(hit.confidence),
			match_tier: tier,
			found: true,
		}
	}

	fn unresolved(original_query: &str) -> Self {
		Self {
			original_query: original_query.to_string(),
			resolved_name: original_query.trim().to_string(),
			record: None,
			match_confidence: None,
			match_tier: MatchTier::None,
			found: false,
			missing_fields: BTreeSet::from([fields::ALL_FIELDS_MISSING.to_string()]),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionBatchResult {
	pub entities: Vec<ResolvedEntity>,
	pub all_found: bool,
	pub missing_names: Vec<String>,
	pub has_data_gaps: bool,
	pub notes: Vec<String>,
}
impl ResolutionBatchResult {
	fn collect(entities: Vec<ResolvedEntity>, notes: Vec<String>) -> Self {
		let all_found = entities.iter().all(|entity| entity.found);
		let missing_names = entities
			.iter()
			.filter(|entity| !entity.found)
			.map(|entity| entity.original_query.clone())
			.collect();
		let has_data_gaps =
			entities.iter().any(|entity| entity.found && !entity.missing_fields.is_empty());

		Self { entities, all_found, missing_names, has_data_gaps, notes }
	}
}

#[derive(Clone)]
pub struct EntityResolver {
	store: Arc<dyn EntityStore>,
	tiers: Vec<Arc<dyn Matcher>>,
}
impl EntityResolver {
	pub fn new(store: Arc<dyn EntityStore>, enable_fuzzy: bool) -> Self {
		let mut tiers: Vec<Arc<dyn Matcher>> =
			vec![Arc::new(ExactMatcher), Arc::new(CaseInsensitiveMatcher)];

		if enable_fuzzy {
			tiers.push(Arc::new(FuzzyMatcher::default()));
		}

		Self::with_tiers(store, tiers)
	}

	pub fn with_tiers(store: Arc<dyn EntityStore>, tiers: Vec<Arc<dyn Matcher>>) -> Self {
		Self { store, tiers }
	}

	/// Resolves one name, returning the entity and any notes it produced.
	pub async fn resolve(&self, name: &str) -> (ResolvedEntity, Vec<String>) {
		let lookup = name.trim();

		if lookup.is_empty() {
			return (ResolvedEntity::unresolved(name), vec![
				"Skipped a blank switch name.".to_string(),
			]);
		}

		for matcher in &self.tiers {
			let tier = matcher.tier();

			match matcher.attempt(self.store.as_ref(), lookup).await {
				Ok(Some(hit)) => {
					let mut notes = Vec::new();

					if tier == MatchTier::Fuzzy && hit.confidence < 1.0 {
						notes.push(fuzzy_note(lookup, &hit));
					}

					return (ResolvedEntity::found(name, tier, hit), notes);
				},
				Ok(None) => continue,
				Err(err) => {
					tracing::warn!(
						name = %lookup,
						tier = tier.as_str(),
						error = %err,
						"Catalog lookup failed. Marking the name unresolved."
					);

					return (ResolvedEntity::unresolved(name), vec![format!(
						"Lookup for '{lookup}' failed during {} matching: {err}",
						tier.as_str()
					)]);
				},
			}
		}

		(ResolvedEntity::unresolved(name), Vec::new())
	}

	/// Resolves names one after another so output and notes follow input order.
	pub async fn resolve_all(&self, names: &[String]) -> ResolutionBatchResult {
		let mut entities = Vec::with_capacity(names.len());
		let mut notes = Vec::new();

		for name in names {
			let (entity, entity_notes) = self.resolve(name).await;

			entities.push(entity);
			notes.extend(entity_notes);
		}

		ResolutionBatchResult::collect(entities, notes)
	}
}

fn fuzzy_note(requested: &str, hit: &TierMatch) -> String {
	format!(
		"'{requested}' resolved to '{}' ({}% confidence)",
		hit.record.name,
		package::confidence_percent(hit.confidence)
	)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRequest {
	pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
	pub batch: ResolutionBatchResult,
	pub context: PackagedContext,
}

impl TactileService {
	pub async fn resolve(&self, req: ResolveRequest) -> ResolveResponse {
		let batch = self.resolver().resolve_all(&req.names).await;
		let context = package::package_resolution(&batch);

		ResolveResponse { batch, context }
	}
}
