//! Renders resolved or retrieved switches into labelled text blocks for the answering model.

use std::fmt::Write as _;

use serde::Serialize;
use uuid::Uuid;

use crate::{
	fields::{self, EXPECTED_FIELDS},
	resolve::{MatchTier, ResolutionBatchResult, ResolvedEntity},
};
use tactile_domain::{candidate::Channel, fusion::FusedResult};
use tactile_storage::models::SwitchRecord;

pub const NOT_AVAILABLE: &str = "N/A";

const INCOMPLETE_DATA_INSTRUCTIONS: &str = "Some requested data is incomplete. Report every field \
shown as N/A as not available instead of estimating it. If you describe a switch that is not in \
the catalog, state explicitly that the information comes from general knowledge and not from the \
catalog.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextItem {
	pub title: String,
	pub text: String,
	pub metadata: ContextMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextMetadata {
	pub switch_id: Option<Uuid>,
	pub name: String,
	pub found: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub match_tier: Option<MatchTier>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub match_confidence: Option<f32>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub channels: Vec<Channel>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fused_score: Option<f32>,
	pub missing_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackagedContext {
	pub items: Vec<ContextItem>,
	pub missing_data_summary: String,
	pub has_incomplete_data: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instructions: Option<String>,
}

/// Requested name and confidence for a record reached through an inexact match.
#[derive(Debug, Clone, Copy)]
pub struct MatchNote<'a> {
	pub requested: &'a str,
	pub confidence: f32,
}

pub fn confidence_percent(confidence: f32) -> u32 {
	(confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// One `LABEL: value` line per attribute, absent values rendered as `N/A`.
pub fn render_record_block(record: &SwitchRecord, match_note: Option<MatchNote<'_>>) -> String {
	let mut out = String::new();
	let manufacturer = record
		.manufacturer
		.as_deref()
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.unwrap_or(NOT_AVAILABLE);

	let _ = writeln!(out, "SWITCH: {}", record.name);
	let _ = writeln!(out, "MANUFACTURER: {manufacturer}");

	for field in EXPECTED_FIELDS {
		let value = fields::field_value(record, field.key);

		let _ = writeln!(out, "{}: {}", field.label, value.as_deref().unwrap_or(NOT_AVAILABLE));
	}

	if let Some(note) = match_note {
		let _ = writeln!(
			out,
			"MATCH CONFIDENCE: {}% (requested \"{}\")",
			confidence_percent(note.confidence),
			note.requested
		);
	}

	let missing = fields::missing_fields(record);

	if !missing.is_empty() {
		let _ = writeln!(out, "MISSING FIELDS: {}", missing.into_iter().collect::<Vec<_>>().join(", "));
	}

	out.trim_end().to_string()
}

pub fn render_not_found_block(name: &str) -> String {
	format!(
		"SWITCH: {name}\nSTATUS: NOT FOUND in the catalog.\nNOTE: No catalog data exists for this \
		 switch. Any details must come from general knowledge and be labelled as such."
	)
}

pub fn package_resolution(batch: &ResolutionBatchResult) -> PackagedContext {
	let items = batch.entities.iter().map(resolution_item).collect();
	let has_incomplete_data = !batch.all_found || batch.has_data_gaps;

	PackagedContext {
		items,
		missing_data_summary: missing_data_summary(batch),
		has_incomplete_data,
		instructions: has_incomplete_data.then(|| INCOMPLETE_DATA_INSTRUCTIONS.to_string()),
	}
}

/// Context for fused retrieval results, preserving their order.
pub fn package_candidates(results: &[FusedResult]) -> PackagedContext {
	let items: Vec<ContextItem> = results.iter().map(candidate_item).collect();
	let has_incomplete_data = items.iter().any(|item| !item.metadata.missing_fields.is_empty());

	PackagedContext {
		missing_data_summary: candidate_gap_summary(&items),
		items,
		has_incomplete_data,
		instructions: has_incomplete_data.then(|| INCOMPLETE_DATA_INSTRUCTIONS.to_string()),
	}
}

fn resolution_item(entity: &ResolvedEntity) -> ContextItem {
	let Some(record) = entity.record.as_ref().filter(|_| entity.found) else {
		let name = if entity.resolved_name.is_empty() {
			entity.original_query.clone()
		} else {
			entity.resolved_name.clone()
		};

		return ContextItem {
			title: name.clone(),
			text: render_not_found_block(&name),
			metadata: ContextMetadata {
				switch_id: None,
				name,
				found: false,
				match_tier: Some(MatchTier::None),
				match_confidence: None,
				channels: Vec::new(),
				fused_score: None,
				missing_fields: entity.missing_fields.iter().cloned().collect(),
			},
		};
	};
	let match_note = entity.match_confidence.filter(|confidence| *confidence < 1.0).map(
		|confidence| MatchNote { requested: entity.original_query.trim(), confidence },
	);

	ContextItem {
		title: record.name.clone(),
		text: render_record_block(record, match_note),
		metadata: ContextMetadata {
			switch_id: Some(record.switch_id),
			name: record.name.clone(),
			found: true,
			match_tier: Some(entity.match_tier),
			match_confidence: entity.match_confidence,
			channels: Vec::new(),
			fused_score: None,
			missing_fields: entity.missing_fields.iter().cloned().collect(),
		},
	}
}

fn candidate_item(result: &FusedResult) -> ContextItem {
	let document = &result.document;
	let name = document.source_entity_name.clone().unwrap_or_else(|| document.id.clone());
	let missing_fields = document
		.metadata
		.get("missing_fields")
		.and_then(|value| value.as_array())
		.map(|values| values.iter().filter_map(|value| value.as_str().map(str::to_string)).collect())
		.unwrap_or_default();

	ContextItem {
		title: name.clone(),
		text: document.content.clone(),
		metadata: ContextMetadata {
			switch_id: Uuid::parse_str(&document.id).ok(),
			name,
			found: true,
			match_tier: None,
			match_confidence: None,
			channels: result.channels_present.iter().copied().collect(),
			fused_score: Some(result.fused_score),
			missing_fields,
		},
	}
}

fn missing_data_summary(batch: &ResolutionBatchResult) -> String {
	let mut parts = Vec::new();

	if !batch.missing_names.is_empty() {
		let names: Vec<&str> = batch.missing_names.iter().map(|name| name.trim()).collect();

		parts.push(format!("Not found in catalog: {}.", names.join(", ")));
	}

	for entity in batch.entities.iter().filter(|entity| entity.found) {
		if entity.missing_fields.is_empty() {
			continue;
		}

		let missing: Vec<&str> = entity.missing_fields.iter().map(String::as_str).collect();

		parts.push(format!("{} is missing: {}.", entity.resolved_name, missing.join(", ")));
	}

	parts.join(" ")
}

fn candidate_gap_summary(items: &[ContextItem]) -> String {
	items
		.iter()
		.filter(|item| !item.metadata.missing_fields.is_empty())
		.map(|item| {
			format!("{} is missing: {}.", item.metadata.name, item.metadata.missing_fields.join(", "))
		})
		.collect::<Vec<_>>()
		.join(" ")
}
