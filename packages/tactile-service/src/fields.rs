//! The ten attributes every complete switch record carries.

use std::collections::BTreeSet;

use tactile_storage::models::SwitchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedField {
	pub key: &'static str,
	pub label: &'static str,
}

/// The sole entry of `missing_fields` for a name that did not resolve.
pub const ALL_FIELDS_MISSING: &str = "all";

pub const EXPECTED_FIELDS: [ExpectedField; 10] = [
	ExpectedField { key: "type", label: "TYPE" },
	ExpectedField { key: "top_housing", label: "TOP HOUSING" },
	ExpectedField { key: "bottom_housing", label: "BOTTOM HOUSING" },
	ExpectedField { key: "stem", label: "STEM" },
	ExpectedField { key: "mount", label: "MOUNT" },
	ExpectedField { key: "spring", label: "SPRING" },
	ExpectedField { key: "actuation_force", label: "ACTUATION FORCE" },
	ExpectedField { key: "bottom_out_force", label: "BOTTOM-OUT FORCE" },
	ExpectedField { key: "pre_travel", label: "PRE-TRAVEL" },
	ExpectedField { key: "total_travel", label: "TOTAL TRAVEL" },
];

/// Display value for one expected field, `None` when the record lacks it.
///
/// Blank text and non-finite numbers count as absent.
pub fn field_value(record: &SwitchRecord, key: &str) -> Option<String> {
	match key {
		"type" => text(&record.switch_type),
		"top_housing" => text(&record.top_housing),
		"bottom_housing" => text(&record.bottom_housing),
		"stem" => text(&record.stem),
		"mount" => text(&record.mount),
		"spring" => text(&record.spring),
		"actuation_force" => measurement(record.actuation_force_g, "g"),
		"bottom_out_force" => measurement(record.bottom_out_force_g, "g"),
		"pre_travel" => measurement(record.pre_travel_mm, "mm"),
		"total_travel" => measurement(record.total_travel_mm, "mm"),
		_ => None,
	}
}

pub fn missing_fields(record: &SwitchRecord) -> BTreeSet<String> {
	EXPECTED_FIELDS
		.iter()
		.filter(|field| field_value(record, field.key).is_none())
		.map(|field| field.key.to_string())
		.collect()
}

fn text(value: &Option<String>) -> Option<String> {
	value.as_deref().map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

fn measurement(value: Option<f32>, unit: &str) -> Option<String> {
	value.filter(|value| value.is_finite()).map(|value| format!("{value} {unit}"))
}
